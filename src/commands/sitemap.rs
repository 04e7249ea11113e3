//! `sitescope sitemap` commands.

use std::fmt::Write;

use crate::cli::SitemapCommand;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::sitemap::{
    annotation_summary, diff_trees, find_node, format_diff, import_sitemap, render_outline,
    AnnotationSummary, ScrapedPage, SitemapBuilder, SitemapData, SitemapKind,
};
use crate::store::ProjectStore;

/// Execute a `sitemap` subcommand.
///
/// # Errors
///
/// Returns an error string if input cannot be read, the import fails, or the
/// store cannot be read or written.
pub fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    command: &SitemapCommand,
) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &settings.store_root);
    let builder = SitemapBuilder::new(ctx.clock.as_ref(), ctx.id_gen.as_ref());

    match command {
        SitemapCommand::Build {
            project,
            url,
            pages,
        } => {
            let text = ctx
                .fs
                .read_to_string(pages)
                .map_err(|e| format!("failed to read {}: {e}", pages.display()))?;
            let rows: Vec<ScrapedPage> = serde_json::from_str(&text)
                .map_err(|e| format!("{}: invalid page rows: {e}", pages.display()))?;
            let data = builder
                .build_from_scraped_pages(&rows, url)
                .map_err(|e| e.to_string())?;
            store
                .save_sitemap(&project.project, SitemapKind::Current, &data)
                .map_err(|e| e.to_string())?;
            log::info!(
                "built current sitemap for {} from {} row(s)",
                project.project,
                rows.len()
            );
            print!("{}", render_stats(&data));
        }
        SitemapCommand::Import {
            project,
            url,
            sitemap_url,
        } => {
            let fetch = import_sitemap(&ctx.http, sitemap_url, settings.fetch_batch);
            let import = super::block_on(fetch)?.map_err(|e| e.to_string())?;
            for error in &import.errors {
                log::warn!("{error}");
            }
            if import.urls.is_empty() {
                return Err(Error::NoUrlsFound(sitemap_url.clone()).to_string());
            }
            let data = builder
                .build_from_url_list(&import.urls, url)
                .map_err(|e| e.to_string())?;
            store
                .save_sitemap(&project.project, SitemapKind::Current, &data)
                .map_err(|e| e.to_string())?;

            let mut out = render_stats(&data);
            let _ = writeln!(
                out,
                "Imported {} URL(s) from {} child sitemap(s)",
                import.urls.len(),
                import.child_sitemaps_found
            );
            if !import.errors.is_empty() {
                let _ = writeln!(out, "Errors:");
                for error in &import.errors {
                    let _ = writeln!(out, "  {error}");
                }
            }
            print!("{out}");
        }
        SitemapCommand::Save {
            project,
            recommended,
            file,
        } => {
            let kind = sitemap_kind(*recommended);
            let text = ctx
                .fs
                .read_to_string(file)
                .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
            let data: SitemapData = serde_json::from_str(&text)
                .map_err(|e| format!("{}: invalid sitemap tree: {e}", file.display()))?;
            store
                .save_sitemap(&project.project, kind, &data)
                .map_err(|e| e.to_string())?;
            log::info!("saved {} sitemap for {}", kind.as_str(), project.project);
            print!("{}", render_stats(&data));
        }
        SitemapCommand::Show {
            project,
            recommended,
        } => {
            let kind = sitemap_kind(*recommended);
            let data = store
                .load_sitemap(&project.project, kind)
                .map_err(|e| e.to_string())?;
            print!("{}", render_show(&data));
        }
        SitemapCommand::Diff { project } => {
            let current = store
                .load_sitemap(&project.project, SitemapKind::Current)
                .map_err(|e| e.to_string())?;
            let recommended = store
                .load_sitemap(&project.project, SitemapKind::Recommended)
                .map_err(|e| e.to_string())?;
            let diff = diff_trees(&current.root_node, &recommended.root_node);
            println!("{}", format_diff(&diff));
        }
        SitemapCommand::MarkScraped {
            project,
            node,
            page_id,
        } => {
            let data = store
                .load_sitemap(&project.project, SitemapKind::Current)
                .map_err(|e| e.to_string())?;
            let Some(target) = find_node(&data.root_node, node) else {
                return Err(format!(
                    "no node {node} in the current sitemap of {}",
                    project.project
                ));
            };
            let label = target.label.clone();
            let updated = data.mark_scraped(node, page_id.as_deref());
            store
                .save_sitemap(&project.project, SitemapKind::Current, &updated)
                .map_err(|e| e.to_string())?;
            println!("Marked {label} ({node}) as scraped");
        }
    }
    Ok(())
}

fn sitemap_kind(recommended: bool) -> SitemapKind {
    if recommended {
        SitemapKind::Recommended
    } else {
        SitemapKind::Current
    }
}

fn render_stats(data: &SitemapData) -> String {
    format!(
        "Sitemap for {}: {} page(s), depth {}\n",
        data.project_url, data.total_pages, data.max_depth
    )
}

fn render_show(data: &SitemapData) -> String {
    let mut out = render_stats(data);
    if let Some(rationale) = &data.ai_rationale {
        let _ = writeln!(out, "Rationale: {rationale}");
    }
    out.push('\n');
    out.push_str(&render_outline(&data.root_node));
    out.push('\n');

    let summary = annotation_summary(&data.root_node);
    if !summary.is_empty() {
        out.push('\n');
        out.push_str(&render_summary(&summary));
    }
    if let Some(changes) = data.key_changes.as_ref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "\nKey changes:");
        for change in changes {
            let _ = writeln!(out, "  - {change}");
        }
    }
    out
}

fn render_summary(summary: &AnnotationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "New: {}  Removed: {}  Moved: {}",
        summary.new_paths.len(),
        summary.removed_paths.len(),
        summary.moved.len()
    );
    for (from, to) in &summary.moved {
        let _ = writeln!(out, "  {from} -> {to}");
    }
    for (priority, paths) in &summary.by_priority {
        let _ = writeln!(out, "{} priority: {}", priority.as_str(), paths.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::cli::ProjectArg;
    use crate::commands::tests::{command_context, test_settings};

    const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://shop.test/</loc></url>
  <url><loc>https://shop.test/products/mug</loc></url>
  <url><loc>https://shop.test/pages/about-us</loc></url>
</urlset>"#;

    fn project() -> ProjectArg {
        ProjectArg {
            project: "p1".into(),
        }
    }

    fn import_command() -> SitemapCommand {
        SitemapCommand::Import {
            project: project(),
            url: "https://shop.test".into(),
            sitemap_url: "https://shop.test/sitemap.xml".into(),
        }
    }

    fn save_command(recommended: bool) -> SitemapCommand {
        SitemapCommand::Save {
            project: project(),
            recommended,
            file: PathBuf::from("/in/tree.json"),
        }
    }

    fn stored(ctx: &ServiceContext, kind: SitemapKind) -> SitemapData {
        let store = ProjectStore::new(ctx, Path::new("/store"));
        store.load_sitemap("p1", kind).unwrap()
    }

    #[test]
    fn build_reads_rows_and_saves_current() {
        let ctx = command_context(&[]);
        let rows = concat!(
            r#"[{"url":"https://shop.test/","title":"Home"},"#,
            r#"{"url":"https://shop.test/collections/all"}]"#,
        );
        ctx.fs.write(Path::new("/in/pages.json"), rows).unwrap();
        let command = SitemapCommand::Build {
            project: project(),
            url: "https://shop.test".into(),
            pages: PathBuf::from("/in/pages.json"),
        };
        run(&ctx, &test_settings(), &command).unwrap();

        let data = stored(&ctx, SitemapKind::Current);
        assert_eq!(data.total_pages, 3);
        assert!(data.root_node.has_content);
    }

    #[test]
    fn import_builds_tree_from_sitemap() {
        let ctx = command_context(&[("https://shop.test/sitemap.xml", 200, URLSET)]);
        run(&ctx, &test_settings(), &import_command()).unwrap();

        let data = stored(&ctx, SitemapKind::Current);
        assert!(find_node(&data.root_node, "n0").is_some());
        assert!(!data.root_node.has_content);
        assert_eq!(data.max_depth, 2);
    }

    #[test]
    fn import_with_no_urls_fails() {
        let empty = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        let ctx = command_context(&[("https://shop.test/sitemap.xml", 200, empty)]);
        let err = run(&ctx, &test_settings(), &import_command()).unwrap_err();
        assert_eq!(
            err,
            "no URLs found in sitemap https://shop.test/sitemap.xml"
        );
    }

    #[test]
    fn save_recommended_tree_enables_show_and_diff() {
        let ctx = command_context(&[("https://shop.test/sitemap.xml", 200, URLSET)]);
        let settings = test_settings();
        run(&ctx, &settings, &import_command()).unwrap();

        let mut tree = stored(&ctx, SitemapKind::Current);
        tree.root_node.children.truncate(1);
        tree.ai_rationale = Some("Drop the about page".into());
        let json = serde_json::to_string(&tree).unwrap();
        ctx.fs.write(Path::new("/in/tree.json"), &json).unwrap();
        run(&ctx, &settings, &save_command(true)).unwrap();

        let recommended = stored(&ctx, SitemapKind::Recommended);
        assert_eq!(recommended, tree);
        let current = stored(&ctx, SitemapKind::Current);
        assert_eq!(current.root_node.children.len(), 2);

        let show = SitemapCommand::Show {
            project: project(),
            recommended: true,
        };
        run(&ctx, &settings, &show).unwrap();
        let diff = SitemapCommand::Diff { project: project() };
        run(&ctx, &settings, &diff).unwrap();

        let changes = diff_trees(&current.root_node, &recommended.root_node);
        assert_eq!(changes.removed_paths, vec!["/pages", "/pages/about-us"]);
        assert!(changes.added_paths.is_empty());
    }

    #[test]
    fn save_rejects_invalid_tree() {
        let ctx = command_context(&[]);
        let path = Path::new("/in/tree.json");
        ctx.fs.write(path, r#"{"rootNode": 1}"#).unwrap();

        let err = run(&ctx, &test_settings(), &save_command(false)).unwrap_err();
        assert!(err.contains("invalid sitemap tree"), "{err}");
        let store = ProjectStore::new(&ctx, Path::new("/store"));
        assert!(store.list_projects().unwrap().is_empty());
    }

    #[test]
    fn mark_scraped_updates_stored_tree() {
        let ctx = command_context(&[("https://shop.test/sitemap.xml", 200, URLSET)]);
        let settings = test_settings();
        run(&ctx, &settings, &import_command()).unwrap();

        let before = stored(&ctx, SitemapKind::Current);
        let mut target = None;
        before.root_node.walk(&mut |node, _| {
            if node.path == "/products/mug" {
                target = Some(node.id.clone());
            }
        });
        let node = target.unwrap();

        let mark = SitemapCommand::MarkScraped {
            project: project(),
            node: node.clone(),
            page_id: Some("page-7".into()),
        };
        run(&ctx, &settings, &mark).unwrap();

        let after = stored(&ctx, SitemapKind::Current);
        let marked = find_node(&after.root_node, &node).unwrap();
        assert!(marked.has_content);
        assert_eq!(marked.metadata.page_id.as_deref(), Some("page-7"));
        assert_eq!(after.generated_at, before.generated_at);
    }

    #[test]
    fn mark_scraped_unknown_node_fails() {
        let ctx = command_context(&[("https://shop.test/sitemap.xml", 200, URLSET)]);
        let settings = test_settings();
        run(&ctx, &settings, &import_command()).unwrap();

        let mark = SitemapCommand::MarkScraped {
            project: project(),
            node: "zzz".into(),
            page_id: None,
        };
        let err = run(&ctx, &settings, &mark).unwrap_err();
        assert!(err.contains("no node zzz"));
    }

    #[test]
    fn diff_needs_both_trees() {
        let ctx = command_context(&[]);
        let diff = SitemapCommand::Diff { project: project() };
        let err = run(&ctx, &test_settings(), &diff).unwrap_err();
        assert!(err.contains("no current sitemap for project p1"));
    }

    #[test]
    fn show_renders_outline_and_summary() {
        use crate::sitemap::tests::node;
        use crate::sitemap::Priority;

        let mut root = node("r", "/", vec![node("a", "/shop", vec![])]);
        root.children[0].metadata.is_new = Some(true);
        root.children[0].metadata.priority = Some(Priority::High);
        let data = SitemapData {
            total_pages: 2,
            max_depth: 1,
            root_node: root,
            generated_at: chrono::Utc::now(),
            project_url: "https://shop.test".into(),
            ai_rationale: Some("Flatter catalogue".into()),
            key_changes: Some(vec!["Add shop hub".into()]),
        };
        let text = render_show(&data);
        assert!(text.contains("Rationale: Flatter catalogue"));
        assert!(text.contains("[+] "));
        assert!(text.contains("New: 1  Removed: 0  Moved: 0"));
        assert!(text.contains("high priority: /shop"));
        assert!(text.contains("  - Add shop hub"));
    }
}
