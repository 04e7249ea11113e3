//! Candidate scoring and winner selection.

use crate::ports::Clock;

use super::signals::{Candidate, DETECTORS};
use super::{details, PageFetchResult, Platform, PlatformDetails, PlatformInfo};

/// Detects the hosting platform of a batch of pages.
///
/// Never fails: an empty batch, or one where no detector fires, yields the
/// `unknown` / `low` result.
#[must_use]
pub fn detect(pages: &[PageFetchResult], clock: &dyn Clock) -> PlatformInfo {
    let detected_at = clock.now();

    let Some(winner) = select_winner(evaluate_all(pages)) else {
        log::debug!("no platform signals across {} page(s)", pages.len());
        return PlatformInfo::unknown(detected_at);
    };

    let details = match winner.platform {
        Platform::Shopify => Some(PlatformDetails::Shopify(details::shopify(pages))),
        Platform::Wordpress => Some(PlatformDetails::Wordpress(details::wordpress(pages))),
        _ => None,
    };
    PlatformInfo::new(winner.platform, winner.signals, detected_at, details)
}

/// Runs every detector and keeps the ones that fired.
fn evaluate_all(pages: &[PageFetchResult]) -> Vec<Candidate> {
    DETECTORS
        .iter()
        .map(|detector| detector.evaluate(pages))
        .inspect(|candidate| {
            log::debug!("{}: {:?}", candidate.platform.as_str(), candidate.signals);
        })
        .filter(|candidate| !candidate.signals.is_empty())
        .collect()
}

/// Highest signal count wins; the stable sort leaves ties in detector order.
fn select_winner(mut candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.sort_by(|a, b| b.signals.len().cmp(&a.signals.len()));
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::platform::Confidence;

    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            "2025-02-03T04:05:06Z".parse().unwrap()
        }
    }

    fn page(url: &str, html: &str) -> PageFetchResult {
        PageFetchResult {
            url: url.into(),
            html: Some(html.into()),
            metadata: None,
        }
    }

    fn candidate(platform: Platform, count: usize) -> Candidate {
        Candidate {
            platform,
            signals: (0..count).map(|i| format!("s{i}")).collect(),
        }
    }

    fn detect_one(html: &str) -> PlatformInfo {
        detect(&[page("https://a.com", html)], &FixedClock)
    }

    #[test]
    fn empty_batch_is_unknown() {
        let info = detect(&[], &FixedClock);
        assert_eq!(info.platform, Platform::Unknown);
        assert_eq!(info.confidence, Confidence::Low);
        assert!(info.signals.is_empty());
        assert_eq!(info.detected_at, FixedClock.now());
    }

    #[test]
    fn plain_site_is_unknown() {
        let info = detect_one("<html><body>hi</body></html>");
        assert_eq!(info.platform, Platform::Unknown);
        assert!(info.shopify_details().is_none());
        assert!(info.wordpress_details().is_none());
    }

    #[test]
    fn confidence_follows_signal_count() {
        let one = detect_one("wixstatic.com");
        assert_eq!(one.platform, Platform::Wix);
        assert_eq!(one.confidence, Confidence::Low);

        let two = detect_one("wp-content/ wp-includes/");
        assert_eq!(two.platform, Platform::Wordpress);
        assert_eq!(two.confidence, Confidence::Medium);

        let three = detect_one("wp-content/ wp-includes/ wp-json");
        assert_eq!(three.platform, Platform::Wordpress);
        assert_eq!(three.confidence, Confidence::High);
    }

    #[test]
    fn strongest_candidate_wins_regardless_of_order() {
        let blog = concat!(
            r#"<meta name="generator" content="WordPress 6.5">"#,
            r#"<link href="/wp-content/themes/astra/s.css">"#,
            r#"<script src="/wp-includes/js/a.js"></script>"#,
            r#"<link rel="https://api.w.org/" href="/wp-json/">"#
        );
        let pages = vec![
            page("https://a.com/", "https://static.parastorage.com/x.js"),
            page("https://a.com/blog", blog),
        ];
        let info = detect(&pages, &FixedClock);
        assert_eq!(info.platform, Platform::Wordpress);
        assert_eq!(info.signals.len(), 4);
        assert_eq!(info.confidence, Confidence::High);
        let theme = info.wordpress_details().unwrap().theme_name.as_deref();
        assert_eq!(theme, Some("astra"));

        let winner = select_winner(vec![
            candidate(Platform::Wix, 1),
            candidate(Platform::Wordpress, 4),
        ]);
        assert_eq!(winner.unwrap().platform, Platform::Wordpress);
    }

    #[test]
    fn ties_go_to_earlier_detector() {
        let winner = select_winner(vec![
            candidate(Platform::Shopify, 2),
            candidate(Platform::Wordpress, 2),
            candidate(Platform::Webflow, 1),
        ]);
        assert_eq!(winner.unwrap().platform, Platform::Shopify);

        let pages = vec![page("https://a.com", "cdn.shopify.com wp-content/")];
        assert_eq!(detect(&pages, &FixedClock).platform, Platform::Shopify);
    }

    #[test]
    fn shopify_winner_carries_details() {
        let home = concat!(
            r#"<body class="template-index">"#,
            r#"<script>Shopify.theme = {"name":"Dawn","id":99};</script>"#,
            r#"<div id="shopify-section-header" class="shopify-section"></div>"#,
            r#"<script src="//cdn.shopify.com/s/files/x.js"></script></body>"#
        );
        let product = r#"<body class="template-product">"#;
        let pages = vec![
            page("https://store.myshopify.com/", home),
            page("https://store.myshopify.com/products/mug", product),
        ];
        let info = detect(&pages, &FixedClock);
        assert_eq!(info.platform, Platform::Shopify);
        assert_eq!(info.confidence, Confidence::High);
        let details = info.shopify_details().unwrap();
        assert_eq!(details.theme_name.as_deref(), Some("Dawn"));
        assert_eq!(details.theme_id.as_deref(), Some("99"));
        assert_eq!(details.templates.len(), 2);
        assert!(info.wordpress_details().is_none());
    }

    #[test]
    fn same_batch_same_result() {
        let html = r#"<div data-wf-page="1"></div> assets.website-files.com"#;
        let pages = vec![page("https://a.com", html)];
        assert_eq!(detect(&pages, &FixedClock), detect(&pages, &FixedClock));
        assert_eq!(detect(&pages, &FixedClock).platform, Platform::Webflow);
    }
}
