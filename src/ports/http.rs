//! HTTP port for fetching pages and sitemap documents.

use std::collections::BTreeMap;
use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future returned by [`HttpClient::get`], keeping the trait dyn-compatible.
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A completed HTTP response. Non-2xx statuses are still responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub url: String,
    /// Status code.
    pub status: u16,
    /// Response headers, names lower-cased.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests.
pub trait HttpClient: Send + Sync {
    /// Fetches `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure (DNS, TLS, timeout). A response
    /// with an error status is returned as `Ok`.
    fn get(&self, url: &str) -> HttpFuture<'_>;
}
