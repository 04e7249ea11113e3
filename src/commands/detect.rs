//! `sitescope detect` command.

use std::fmt::Write;

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::fetch;
use crate::platform::{self, PlatformInfo};
use crate::store::ProjectStore;

/// Execute the `detect` command.
///
/// Fetches every URL, fingerprints the platform, stores the result under
/// `project` and prints it.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the store write fails.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    project: &str,
    urls: &[String],
) -> Result<(), String> {
    let pages = super::block_on(fetch::fetch_pages(&ctx.http, urls, settings.fetch_batch))?;
    let fetched = pages.iter().filter(|p| p.html.is_some()).count();
    log::info!("fetched {fetched} of {} page(s)", pages.len());

    let info = platform::detect(&pages, ctx.clock.as_ref());
    ProjectStore::new(ctx, &settings.store_root)
        .save_platform(project, &info)
        .map_err(|e| e.to_string())?;

    print!("{}", render(&info));
    Ok(())
}

/// Text report of a detection result.
fn render(info: &PlatformInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Platform: {}", info.platform.as_str());
    let _ = writeln!(out, "Confidence: {}", info.confidence.as_str());

    if info.signals.is_empty() {
        let _ = writeln!(out, "Signals: none");
    } else {
        let _ = writeln!(out, "Signals:");
        for signal in &info.signals {
            let _ = writeln!(out, "  - {signal}");
        }
    }

    if let Some(details) = info.shopify_details() {
        if let Some(theme) = &details.theme_name {
            let id = details
                .theme_id
                .as_deref()
                .map(|id| format!(" (id {id})"))
                .unwrap_or_default();
            let _ = writeln!(out, "Theme: {theme}{id}");
        }
        if !details.templates.is_empty() {
            let _ = writeln!(out, "Templates:");
            for template in &details.templates {
                let _ = writeln!(out, "  {} ({} page(s))", template.name, template.count);
            }
        }
    }

    if let Some(details) = info.wordpress_details() {
        if let Some(theme) = &details.theme_name {
            let _ = writeln!(out, "Theme: {theme}");
        }
        if !details.plugins.is_empty() {
            let _ = writeln!(out, "Plugins: {}", details.plugins.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::commands::tests::{command_context, test_settings};
    use crate::platform::{Confidence, Platform};

    const SHOPIFY_HOME: &str = r#"<html><head>
        <link rel="stylesheet" href="https://cdn.shopify.com/s/files/theme.css">
        <script>Shopify.theme = {"name":"Dawn","id":1234};</script>
        </head><body class="template-index"></body></html>"#;

    #[test]
    fn detects_and_stores_platform() {
        let ctx = command_context(&[("https://shop.test/", 200, SHOPIFY_HOME)]);
        let settings = test_settings();
        run(&ctx, &settings, "p1", &["https://shop.test/".into()]).unwrap();

        let path = Path::new("/store/projects/p1/platform.json");
        let stored = ctx.fs.read_to_string(path).unwrap();
        let info: PlatformInfo = serde_json::from_str(&stored).unwrap();
        assert_eq!(info.platform, Platform::Shopify);
        assert_eq!(info.detected_at.to_rfc3339(), "2025-05-02T09:00:00+00:00");
    }

    #[test]
    fn unreachable_pages_still_store_unknown() {
        let ctx = command_context(&[]);
        run(&ctx, &test_settings(), "p2", &["https://down.test/".into()]).unwrap();

        let path = Path::new("/store/projects/p2/platform.json");
        let stored = ctx.fs.read_to_string(path).unwrap();
        let info: PlatformInfo = serde_json::from_str(&stored).unwrap();
        assert_eq!(info.platform, Platform::Unknown);
        assert_eq!(info.confidence, Confidence::Low);
    }

    #[test]
    fn render_lists_signals_and_details() {
        let info = PlatformInfo::unknown(chrono::Utc::now());
        let text = render(&info);
        assert!(text.contains("Platform: unknown"));
        assert!(text.contains("Signals: none"));
    }
}
