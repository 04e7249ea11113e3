//! Replaying adapter for the `HttpClient` port.

use std::sync::Mutex;

use serde_json::json;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::http::{HttpClient, HttpFuture, HttpResponse};

/// Replays recorded HTTP responses from a cassette.
///
/// Requests are matched by URL rather than call order, since pages in a
/// batch complete in whatever order the network delivered them.
pub struct ReplayingHttpClient {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHttpClient {
    /// Creates a new replaying HTTP client from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl HttpClient for ReplayingHttpClient {
    fn get(&self, url: &str) -> HttpFuture<'_> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_matching("http", "get", &json!({ "url": url }));
            interaction.output.clone()
        };
        Box::pin(async move { extract_result::<HttpResponse>(&output, "http::get") })
    }
}
