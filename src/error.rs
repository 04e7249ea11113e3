//! Crate-level error type.

use thiserror::Error;

/// Errors surfaced by the library layer (import, store, token files).
///
/// The core transformations (token flattening, platform detection, tree
/// building) degrade to defaults instead of failing; this type only covers
/// I/O boundaries and unusable caller input.
#[derive(Debug, Error)]
pub enum Error {
    /// A URL supplied by the caller could not be parsed.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A request could not be completed at the transport level.
    #[error("failed to fetch {url}: {message}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// A request completed with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// A sitemap document was not well-formed XML.
    #[error("failed to parse sitemap XML from {url}: {message}")]
    SitemapXml {
        /// Source URL of the document.
        url: String,
        /// Parser error message.
        message: String,
    },

    /// A sitemap import produced no page URLs at all.
    #[error("no URLs found in sitemap {0}")]
    NoUrlsFound(String),

    /// A stored record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem failure reported by the filesystem port.
    #[error("{context}: {message}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Error message from the port.
        message: String,
    },

    /// JSON (de)serialization failure.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Builds an [`Error::Io`] from a port error and a short description.
    pub(crate) fn io(context: impl Into<String>, err: &dyn std::fmt::Display) -> Self {
        Self::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }
}

/// Result alias using the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
