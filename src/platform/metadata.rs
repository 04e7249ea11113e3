//! `<meta>` tag extraction from raw HTML.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::{Map, Value};

static META_WITH_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[content]").expect("meta selector"));

/// Attributes naming a meta tag, in lookup order.
const KEY_ATTRIBUTES: [&str; 4] = ["name", "property", "http-equiv", "itemprop"];

/// Collects `<meta KEY="k" content="v">` pairs from the parsed document.
///
/// Keys are lower-cased; the first tag for a key wins. Tags without a key
/// attribute are ignored, as are comments and script text.
#[must_use]
pub fn extract(html: &str) -> Map<String, Value> {
    let document = Html::parse_document(html);
    let mut metadata = Map::new();
    for element in document.select(&META_WITH_CONTENT) {
        let tag = element.value();
        let Some(key) = KEY_ATTRIBUTES.iter().find_map(|name| tag.attr(name)) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let content = tag.attr("content").unwrap_or_default();
        if !key.is_empty() && !metadata.contains_key(&key) {
            metadata.insert(key, Value::String(content.to_string()));
        }
    }
    metadata
}

/// Returns the `content` of the first meta tag named `key` (case-insensitive).
#[must_use]
pub fn meta_content(html: &str, key: &str) -> Option<String> {
    extract(html)
        .remove(&key.to_ascii_lowercase())
        .and_then(|v| v.as_str().map(String::from))
}
