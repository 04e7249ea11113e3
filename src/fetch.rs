//! Batched concurrent fetching over the HTTP port.
//!
//! URLs are fetched in consecutive batches of `batch_size`. Within a batch
//! every request runs concurrently and all of them settle before the next
//! batch starts; one failure never cancels its siblings.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::platform::{metadata, PageFetchResult};
use crate::ports::{HttpClient, HttpResponse};

/// Outcome of one request: the response, or a transport error message.
pub type FetchOutcome = Result<HttpResponse, String>;

/// Fetches every URL, returning outcomes in input order.
///
/// A `batch_size` of zero is treated as one.
pub async fn fetch_all(
    http: &Arc<dyn HttpClient>,
    urls: &[String],
    batch_size: usize,
) -> Vec<FetchOutcome> {
    let batch_size = batch_size.max(1);
    let mut outcomes = Vec::with_capacity(urls.len());

    for (batch_index, batch) in urls.chunks(batch_size).enumerate() {
        log::debug!("fetch batch {} ({} url(s))", batch_index + 1, batch.len());
        let mut set = JoinSet::new();
        for (index, url) in batch.iter().enumerate() {
            let http = Arc::clone(http);
            let url = url.clone();
            set.spawn(async move {
                let outcome = http.get(&url).await.map_err(|e| e.to_string());
                (index, outcome)
            });
        }

        let mut settled: Vec<Option<FetchOutcome>> = vec![None; batch.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => settled[index] = Some(outcome),
                Err(e) => log::warn!("fetch task failed: {e}"),
            }
        }
        for outcome in settled {
            outcomes.push(outcome.unwrap_or_else(|| Err("fetch task aborted".to_string())));
        }
    }
    outcomes
}

/// Fetches pages for platform detection.
///
/// Failed requests and non-2xx responses yield a result with no HTML and no
/// metadata, so detection still sees the URL.
pub async fn fetch_pages(
    http: &Arc<dyn HttpClient>,
    urls: &[String],
    batch_size: usize,
) -> Vec<PageFetchResult> {
    let outcomes = fetch_all(http, urls, batch_size).await;
    urls.iter()
        .zip(outcomes)
        .map(|(url, outcome)| match outcome {
            Ok(response) if response.is_success() => PageFetchResult {
                url: url.clone(),
                metadata: Some(metadata::extract(&response.body)),
                html: Some(response.body),
            },
            Ok(response) => {
                log::warn!("{url} returned HTTP {}", response.status);
                unfetched(url)
            }
            Err(e) => {
                log::warn!("failed to fetch {url}: {e}");
                unfetched(url)
            }
        })
        .collect()
}

fn unfetched(url: &str) -> PageFetchResult {
    PageFetchResult {
        url: url.to_string(),
        html: None,
        metadata: None,
    }
}
