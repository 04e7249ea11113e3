//! Signal tables for each platform detector.
//!
//! Each detector is an ordered list of `(label, matcher)` rows. A row fires
//! when its matcher accepts any page of the batch; scanning stops at the
//! first matching page, so a signal counts once however many pages show it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::metadata;
use super::{PageFetchResult, Platform};

/// How a single signal is tested against one page.
#[derive(Debug)]
pub enum Matcher {
    /// Any of these keys is present in the page metadata (case-insensitive).
    MetadataKey(&'static [&'static str]),
    /// The HTML contains any of these substrings.
    HtmlContains(&'static [&'static str]),
    /// The HTML matches this pattern.
    HtmlPattern(Regex),
    /// The page URL contains this substring.
    UrlContains(&'static str),
    /// The `generator` meta value contains this word (case-insensitive).
    Generator(&'static str),
}

/// One row of a detector table.
#[derive(Debug)]
pub struct Signal {
    /// Label reported in `PlatformInfo::signals`.
    pub label: &'static str,
    /// Test applied to each page.
    pub matcher: Matcher,
}

/// A platform and its signal table.
#[derive(Debug)]
pub struct Detector {
    /// Platform this detector votes for.
    pub platform: Platform,
    /// Signal rows in reporting order.
    pub signals: Vec<Signal>,
}

/// A detector's verdict over a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Platform voted for.
    pub platform: Platform,
    /// Labels of the signals that fired.
    pub signals: Vec<String>,
}

fn pattern(source: &str) -> Matcher {
    Matcher::HtmlPattern(Regex::new(source).expect("signal pattern"))
}

fn signal(label: &'static str, matcher: Matcher) -> Signal {
    Signal { label, matcher }
}

/// Detectors in evaluation order. Ties between equally strong candidates go
/// to the earlier entry.
pub static DETECTORS: LazyLock<Vec<Detector>> = LazyLock::new(|| {
    vec![
        Detector {
            platform: Platform::Shopify,
            signals: vec![
                signal(
                    "Shopify checkout meta tags",
                    Matcher::MetadataKey(&["shopify-checkout-api-token", "shopify-digital-wallet"]),
                ),
                signal(
                    "Shopify CDN assets",
                    Matcher::HtmlContains(&["cdn.shopify.com"]),
                ),
                signal("Shopify.theme object", pattern(r"Shopify\.theme\s*=")),
                signal(
                    "myshopify.com domain",
                    Matcher::UrlContains(".myshopify.com"),
                ),
                signal(
                    "Shopify template body class",
                    pattern(r#"class="[^"]*template-\w+"#),
                ),
                signal(
                    "Shopify sections",
                    Matcher::HtmlContains(&["shopify-section"]),
                ),
            ],
        },
        Detector {
            platform: Platform::Wordpress,
            signals: vec![
                signal("wp-content paths", Matcher::HtmlContains(&["wp-content/"])),
                signal(
                    "wp-includes paths",
                    Matcher::HtmlContains(&["wp-includes/"]),
                ),
                signal("WordPress REST API", Matcher::HtmlContains(&["wp-json"])),
                signal(
                    "WordPress generator meta tag",
                    Matcher::Generator("wordpress"),
                ),
            ],
        },
        Detector {
            platform: Platform::Wix,
            signals: vec![
                signal(
                    "wixstatic.com media",
                    Matcher::HtmlContains(&["wixstatic.com"]),
                ),
                signal(
                    "Wix platform assets",
                    pattern(r"static\.wixstatic\.com|static\.parastorage\.com|wix-code-sdk"),
                ),
                signal("Wix generator meta tag", Matcher::Generator("wix")),
            ],
        },
        Detector {
            platform: Platform::Squarespace,
            signals: vec![
                signal(
                    "Squarespace CDN assets",
                    Matcher::HtmlContains(&["static1.squarespace.com", "squarespace-cdn.com"]),
                ),
                signal(
                    "Squarespace generator meta tag",
                    Matcher::Generator("squarespace"),
                ),
                signal(
                    "Squarespace cache-version attribute",
                    Matcher::HtmlContains(&["data-squarespace-cacheversion"]),
                ),
            ],
        },
        Detector {
            platform: Platform::Webflow,
            signals: vec![
                signal("Webflow data-wf attributes", pattern(r"data-wf-[a-z]+")),
                signal(
                    "Webflow hosting",
                    Matcher::HtmlContains(&[
                        "assets.website-files.com",
                        "uploads-ssl.webflow.com",
                        ".webflow.io",
                    ]),
                ),
                signal(
                    "Webflow generator meta tag",
                    Matcher::Generator("webflow"),
                ),
            ],
        },
    ]
});

impl Matcher {
    /// Tests this matcher against one page.
    #[must_use]
    pub fn matches(&self, page: &PageFetchResult) -> bool {
        match self {
            Self::MetadataKey(keys) => has_metadata_key(page, keys),
            Self::HtmlContains(needles) => {
                html_matches(page, |html| needles.iter().any(|n| html.contains(n)))
            }
            Self::HtmlPattern(regex) => html_matches(page, |html| regex.is_match(html)),
            Self::UrlContains(needle) => page.url.contains(needle),
            Self::Generator(word) => {
                generator(page).is_some_and(|g| g.to_ascii_lowercase().contains(word))
            }
        }
    }
}

fn html_matches(page: &PageFetchResult, test: impl Fn(&str) -> bool) -> bool {
    page.html.as_deref().is_some_and(test)
}

fn has_metadata_key(page: &PageFetchResult, keys: &[&str]) -> bool {
    let Some(meta) = &page.metadata else {
        return false;
    };
    meta.keys()
        .any(|k| keys.iter().any(|want| k.eq_ignore_ascii_case(want)))
}

/// The page's `generator` value: provider metadata first, then the HTML.
fn generator(page: &PageFetchResult) -> Option<String> {
    if let Some(meta) = &page.metadata {
        for (key, value) in meta {
            if !key.eq_ignore_ascii_case("generator") {
                continue;
            }
            match value {
                Value::String(s) => return Some(s.clone()),
                Value::Array(items) => {
                    let words: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                    return Some(words.join(" "));
                }
                _ => break,
            }
        }
    }
    let html = page.html.as_deref()?;
    metadata::meta_content(html, "generator")
}

impl Detector {
    /// Runs every signal row over the batch.
    #[must_use]
    pub fn evaluate(&self, pages: &[PageFetchResult]) -> Candidate {
        let signals = self
            .signals
            .iter()
            .filter(|row| pages.iter().any(|page| row.matcher.matches(page)))
            .map(|row| row.label.to_string())
            .collect();
        Candidate {
            platform: self.platform,
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;

    fn page(url: &str, html: &str) -> PageFetchResult {
        PageFetchResult {
            url: url.into(),
            html: Some(html.into()),
            metadata: None,
        }
    }

    fn meta_only(url: &str, metadata: Option<Map<String, Value>>) -> PageFetchResult {
        PageFetchResult {
            url: url.into(),
            html: None,
            metadata,
        }
    }

    fn detector(platform: Platform) -> &'static Detector {
        DETECTORS.iter().find(|d| d.platform == platform).unwrap()
    }

    #[test]
    fn detectors_run_shopify_first() {
        let order: Vec<Platform> = DETECTORS.iter().map(|d| d.platform).collect();
        assert_eq!(
            order,
            vec![
                Platform::Shopify,
                Platform::Wordpress,
                Platform::Wix,
                Platform::Squarespace,
                Platform::Webflow
            ]
        );
    }

    #[test]
    fn signal_counts_once_across_many_pages() {
        let pages = vec![
            page("https://a.com/", r#"<script src="/cdn.shopify.com/a.js">"#),
            page("https://a.com/b", r#"<script src="/cdn.shopify.com/b.js">"#),
        ];
        let candidate = detector(Platform::Shopify).evaluate(&pages);
        assert_eq!(candidate.signals, vec!["Shopify CDN assets"]);
    }

    #[test]
    fn signals_may_come_from_different_pages() {
        let mut meta = Map::new();
        meta.insert("shopify-digital-wallet".into(), json!("/wallets"));
        let body = r#"<body class="page template-collection"><div class="shopify-section">"#;
        let pages = vec![
            meta_only("https://shop.myshopify.com/", Some(meta)),
            page("https://shop.myshopify.com/c", body),
        ];
        let candidate = detector(Platform::Shopify).evaluate(&pages);
        assert_eq!(
            candidate.signals,
            vec![
                "Shopify checkout meta tags",
                "myshopify.com domain",
                "Shopify template body class",
                "Shopify sections"
            ]
        );
    }

    #[test]
    fn generator_checks_metadata_then_html() {
        let mut meta = Map::new();
        meta.insert("Generator".into(), json!("WordPress 6.4"));
        let from_meta = meta_only("https://a.com", Some(meta));
        assert!(Matcher::Generator("wordpress").matches(&from_meta));

        let tag = r#"<meta name="generator" content="Webflow">"#;
        let from_html = page("https://a.com", tag);
        assert!(Matcher::Generator("webflow").matches(&from_html));
        assert!(!Matcher::Generator("wix").matches(&from_html));
    }

    #[test]
    fn commented_out_generator_does_not_vote() {
        let html = r#"<!-- <meta name="generator" content="WordPress 6.4"> -->"#;
        let pages = vec![page("https://a.com", html)];
        let candidate = detector(Platform::Wordpress).evaluate(&pages);
        assert!(candidate.signals.is_empty());
    }

    #[test]
    fn pages_without_html_only_match_url_and_metadata() {
        let bare = meta_only("https://x.com/", None);
        for d in DETECTORS.iter() {
            assert!(d.evaluate(std::slice::from_ref(&bare)).signals.is_empty());
        }
    }

    #[test]
    fn wix_signals_overlap_on_static_host() {
        let img = r#"<img src="https://static.wixstatic.com/media/x.png">"#;
        let candidate = detector(Platform::Wix).evaluate(&[page("https://a.com", img)]);
        assert_eq!(
            candidate.signals,
            vec!["wixstatic.com media", "Wix platform assets"]
        );
    }
}
