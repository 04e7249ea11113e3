//! ID generator port for sitemap node identifiers.

/// Generates unique identifiers.
///
/// Every node created by the sitemap builder draws its `id` from here.
/// Replay substitutes a recorded sequence so tree ids are reproducible.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
