//! Clock port: source of `detectedAt` / `generatedAt` timestamps.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Detection results and sitemap trees are stamped through this port so a
/// replayed session reproduces the same timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
