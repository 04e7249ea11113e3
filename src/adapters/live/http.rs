//! Live adapter for the `HttpClient` port using `reqwest`.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;

use crate::ports::http::{HttpClient, HttpFuture, HttpResponse};

/// Live HTTP client following redirects, with a fixed timeout and User-Agent.
pub struct LiveHttpClient {
    client: Client,
}

impl LiveHttpClient {
    /// Creates a client with the given per-request timeout and User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for LiveHttpClient {
    fn get(&self, url: &str) -> HttpFuture<'_> {
        let url = url.to_string();

        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("GET {url} failed: {e}").into()
                })?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let headers: BTreeMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();

            let body = response
                .text()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to read response body from {url}: {e}").into()
                })?;

            log::debug!("GET {url} -> {status} ({} bytes)", body.len());
            Ok(HttpResponse {
                url: final_url,
                status,
                headers,
                body,
            })
        })
    }
}
