//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod filesystem;
pub mod http;
pub mod id_gen;

pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use http::ReplayingHttpClient;
pub use id_gen::ReplayingIdGenerator;

/// Extracts a Result from a cassette output JSON value.
///
/// Expects `{"ok": <value>}` or `{"err": "message"}`.
pub(crate) fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    pub(crate) fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[test]
    fn extract_result_reads_both_tags() {
        let ok: Result<Vec<String>, _> = extract_result(&json!({"ok": ["a"]}), "t");
        assert_eq!(ok.unwrap(), vec!["a".to_string()]);

        let err: Result<String, _> = extract_result(&json!({"err": "gone"}), "t");
        assert_eq!(err.unwrap_err().to_string(), "gone");
    }

    #[test]
    fn extract_result_reports_shape_mismatch() {
        let bad: Result<u16, _> = extract_result(&json!({"ok": "text"}), "http::get");
        let message = bad.unwrap_err().to_string();
        assert!(message.starts_with("http::get: failed to deserialize"));
    }
}
