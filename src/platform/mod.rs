//! Hosting platform / CMS fingerprinting over a batch of fetched pages.
//!
//! Independent per-platform detectors each look for a fixed table of
//! signals across the whole batch. The detector with the most signals wins,
//! and only the winner gets platform-specific details extracted.

pub mod detect;
pub mod details;
pub mod metadata;
pub mod signals;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use detect::detect;

/// One fetched page as handed over by the crawl step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFetchResult {
    /// The requested URL.
    pub url: String,
    /// Raw HTML, absent when the fetch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Page metadata (meta tags and provider extras).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Detected hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Shopify storefront.
    Shopify,
    /// WordPress site.
    Wordpress,
    /// Wix site.
    Wix,
    /// Squarespace site.
    Squarespace,
    /// Webflow site.
    Webflow,
    /// Hand-built site; set by analysts, never by the detector.
    Custom,
    /// No detector fired.
    Unknown,
}

impl Platform {
    /// Lower-case name as used in persisted JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shopify => "shopify",
            Self::Wordpress => "wordpress",
            Self::Wix => "wix",
            Self::Squarespace => "squarespace",
            Self::Webflow => "webflow",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }
}

/// Confidence tier derived from the winning signal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Three or more signals.
    High,
    /// Exactly two signals.
    Medium,
    /// One signal, or nothing detected.
    Low,
}

impl Confidence {
    /// Maps a signal count to its tier.
    #[must_use]
    pub fn from_signal_count(count: usize) -> Self {
        match count {
            3.. => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Lower-case name as used in persisted JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A template observed on Shopify pages, with up to five sample URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopifyTemplate {
    /// Template name taken from the `template-<name>` body class.
    pub name: String,
    /// Number of pages using the template.
    pub count: usize,
    /// Sample page URLs (at most five).
    pub pages: Vec<String>,
}

/// Details extracted when Shopify wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyDetails {
    /// Theme name from the `Shopify.theme` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_name: Option<String>,
    /// Numeric theme id, kept as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    /// Template inventory.
    #[serde(default)]
    pub templates: Vec<ShopifyTemplate>,
}

/// Details extracted when WordPress wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordpressDetails {
    /// Active theme directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_name: Option<String>,
    /// Plugin directory names, first-seen order, no duplicates.
    #[serde(default)]
    pub plugins: Vec<String>,
}

/// Platform-specific details; at most one kind is ever attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformDetails {
    /// Shopify theme and templates.
    Shopify(ShopifyDetails),
    /// WordPress theme and plugins.
    Wordpress(WordpressDetails),
}

/// Result of one detection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    /// Winning platform.
    pub platform: Platform,
    /// Confidence tier.
    pub confidence: Confidence,
    /// Human-readable signal labels, in detector table order.
    pub signals: Vec<String>,
    /// When the detection ran.
    pub detected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shopify_details: Option<ShopifyDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wordpress_details: Option<WordpressDetails>,
}

impl PlatformInfo {
    /// The "nothing detected" result.
    #[must_use]
    pub fn unknown(detected_at: DateTime<Utc>) -> Self {
        Self {
            platform: Platform::Unknown,
            confidence: Confidence::Low,
            signals: Vec::new(),
            detected_at,
            shopify_details: None,
            wordpress_details: None,
        }
    }

    /// Builds a result, attaching `details` only when they match `platform`.
    #[must_use]
    pub fn new(
        platform: Platform,
        signals: Vec<String>,
        detected_at: DateTime<Utc>,
        details: Option<PlatformDetails>,
    ) -> Self {
        let (shopify_details, wordpress_details) = match (platform, details) {
            (Platform::Shopify, Some(PlatformDetails::Shopify(d))) => (Some(d), None),
            (Platform::Wordpress, Some(PlatformDetails::Wordpress(d))) => (None, Some(d)),
            _ => (None, None),
        };
        Self {
            platform,
            confidence: Confidence::from_signal_count(signals.len()),
            signals,
            detected_at,
            shopify_details,
            wordpress_details,
        }
    }

    /// Shopify details, present only for Shopify results.
    #[must_use]
    pub fn shopify_details(&self) -> Option<&ShopifyDetails> {
        self.shopify_details.as_ref()
    }

    /// WordPress details, present only for WordPress results.
    #[must_use]
    pub fn wordpress_details(&self) -> Option<&WordpressDetails> {
        self.wordpress_details.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        "2025-05-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(Confidence::from_signal_count(0), Confidence::Low);
        assert_eq!(Confidence::from_signal_count(1), Confidence::Low);
        assert_eq!(Confidence::from_signal_count(2), Confidence::Medium);
        assert_eq!(Confidence::from_signal_count(3), Confidence::High);
        assert_eq!(Confidence::from_signal_count(6), Confidence::High);
    }

    #[test]
    fn mismatched_details_are_dropped() {
        let info = PlatformInfo::new(
            Platform::Wix,
            vec!["a".into()],
            at(),
            Some(PlatformDetails::Shopify(ShopifyDetails::default())),
        );
        assert!(info.shopify_details().is_none());
        assert!(info.wordpress_details().is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_details() {
        let info = PlatformInfo::new(
            Platform::Wordpress,
            vec!["wp-content assets".into(), "wp-includes scripts".into()],
            at(),
            Some(PlatformDetails::Wordpress(WordpressDetails {
                theme_name: Some("astra".into()),
                plugins: vec!["woocommerce".into()],
            })),
        );
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({
                "platform": "wordpress",
                "confidence": "medium",
                "signals": ["wp-content assets", "wp-includes scripts"],
                "detectedAt": "2025-05-01T12:00:00Z",
                "wordpressDetails": {"themeName": "astra", "plugins": ["woocommerce"]}
            })
        );
        let back: PlatformInfo = serde_json::from_value(value).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn unknown_result_has_no_signals() {
        let info = PlatformInfo::unknown(at());
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["platform"], "unknown");
        assert_eq!(value["confidence"], "low");
        assert_eq!(value["signals"], json!([]));
        assert!(value.get("shopifyDetails").is_none());
    }
}
