//! Platform-specific detail extraction, run for the winning platform only.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{PageFetchResult, ShopifyDetails, ShopifyTemplate, WordpressDetails};

/// Sample URLs kept per Shopify template.
const TEMPLATE_SAMPLE_LIMIT: usize = 5;

fn compile(source: &str) -> Regex {
    Regex::new(source).expect("detail pattern")
}

static THEME_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Shopify\.theme\s*=\s*(\{[^}]*\})"));
static THEME_NAME: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        compile(r#""name"\s*:\s*"([^"]*)""#),
        compile(r#"\bname\s*:\s*['"]([^'"]*)['"]"#),
    ]
});
static THEME_ID: LazyLock<[Regex; 2]> =
    LazyLock::new(|| [compile(r#""id"\s*:\s*(\d+)"#), compile(r"\bid\s*:\s*(\d+)")]);
static BODY_CLASS: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?is)<body\b[^>]*?\bclass\s*=\s*["']([^"']*)["']"#));
static TEMPLATE_CLASS: LazyLock<Regex> = LazyLock::new(|| compile(r"template-(\w+)"));
static WP_THEME: LazyLock<Regex> = LazyLock::new(|| compile(r"wp-content/themes/([\w.-]+)"));
static WP_PLUGIN: LazyLock<Regex> = LazyLock::new(|| compile(r"wp-content/plugins/([\w.-]+)"));

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Extracts the Shopify theme identity and the template inventory.
#[must_use]
pub fn shopify(pages: &[PageFetchResult]) -> ShopifyDetails {
    let mut details = ShopifyDetails::default();

    for html in pages.iter().filter_map(|p| p.html.as_deref()) {
        let Some(object) = THEME_OBJECT.captures(html) else {
            continue;
        };
        let object = &object[1];
        if details.theme_name.is_none() {
            details.theme_name = first_capture(&*THEME_NAME, object);
        }
        if details.theme_id.is_none() {
            details.theme_id = first_capture(&*THEME_ID, object);
        }
        if details.theme_name.is_some() {
            break;
        }
    }

    details.templates = templates(pages);
    details
}

/// The `<name>` of the page's `template-<name>` body class.
fn template_name(page: &PageFetchResult) -> Option<String> {
    let classes = BODY_CLASS.captures(page.html.as_deref()?)?;
    let template = TEMPLATE_CLASS.captures(&classes[1])?;
    Some(template[1].to_string())
}

/// Buckets page URLs by their `template-<name>` body class.
///
/// Ordered by page count (descending), then template name.
fn templates(pages: &[PageFetchResult]) -> Vec<ShopifyTemplate> {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for page in pages {
        if let Some(name) = template_name(page) {
            buckets.entry(name).or_default().push(page.url.clone());
        }
    }

    let mut templates: Vec<ShopifyTemplate> = buckets
        .into_iter()
        .map(|(name, mut urls)| {
            let count = urls.len();
            urls.truncate(TEMPLATE_SAMPLE_LIMIT);
            ShopifyTemplate {
                name,
                count,
                pages: urls,
            }
        })
        .collect();
    // Stable, so equal counts stay in name order.
    templates.sort_by_key(|t| Reverse(t.count));
    templates
}

/// Extracts the WordPress theme (first page that names one) and every plugin
/// referenced anywhere in the batch.
#[must_use]
pub fn wordpress(pages: &[PageFetchResult]) -> WordpressDetails {
    let htmls = || pages.iter().filter_map(|p| p.html.as_deref());

    let theme_name = htmls()
        .find_map(|html| WP_THEME.captures(html))
        .map(|caps| caps[1].to_string());

    let mut seen = HashSet::new();
    let plugins = htmls()
        .flat_map(|html| WP_PLUGIN.captures_iter(html))
        .map(|caps| caps[1].to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect();

    WordpressDetails {
        theme_name,
        plugins,
    }
}
