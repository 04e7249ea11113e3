//! Page type inference from a normalized path.

use std::sync::LazyLock;

use regex::Regex;

use super::PageType;

/// Ordered `(pattern, type)` rows; the first match wins.
static RULES: LazyLock<Vec<(Regex, PageType)>> = LazyLock::new(|| {
    [
        (r"^/$", PageType::Homepage),
        (r"^/collections(/[^/]+)?$", PageType::Collection),
        (r"^/products/[^/]+$", PageType::Product),
        (r"^/pages/[^/]+$", PageType::Page),
        (r"^/blogs(/[^/]+)?$", PageType::Blog),
        (r"^/blogs/[^/]+/[^/]+$", PageType::Article),
    ]
    .into_iter()
    .map(|(source, page_type)| (Regex::new(source).expect("page type pattern"), page_type))
    .collect()
});

/// Classifies a normalized path (leading slash, no trailing slash).
#[must_use]
pub fn classify(path: &str) -> PageType {
    RULES
        .iter()
        .find(|(re, _)| re.is_match(path))
        .map_or(PageType::Other, |(_, t)| *t)
}
