//! Recording adapter for the `HttpClient` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::http::{HttpClient, HttpFuture};

/// Records HTTP requests and their outcomes while delegating to an inner client.
///
/// The inner client is shared so a recording context can hand the same
/// transport to concurrent fetch tasks.
pub struct RecordingHttpClient {
    inner: Arc<dyn HttpClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingHttpClient {
    /// Creates a new recording client wrapping the given implementation.
    pub fn new(inner: Arc<dyn HttpClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct GetInput<'a> {
    url: &'a str,
}

impl HttpClient for RecordingHttpClient {
    fn get(&self, url: &str) -> HttpFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let result = self.inner.get(&url).await;
            let input = GetInput { url: &url };
            record_result(&self.recorder, "http", "get", &input, &result);
            result
        })
    }
}
