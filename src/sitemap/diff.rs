//! Structural diffing between two sitemap trees.

use std::collections::BTreeMap;

use crate::sitemap::{PageType, SitemapNode};

/// Differences between a current and a recommended tree, keyed by path.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SitemapDiff {
    /// Paths present in the recommended tree only.
    pub added_paths: Vec<String>,
    /// Paths present in the current tree only.
    pub removed_paths: Vec<String>,
    /// Paths present in both whose page type changed.
    pub retyped: Vec<PageTypeChange>,
}

/// A page type change at one path.
#[derive(Debug, PartialEq, Eq)]
pub struct PageTypeChange {
    /// Path of the node.
    pub path: String,
    /// Type in the current tree.
    pub from: PageType,
    /// Type in the recommended tree.
    pub to: PageType,
}

impl SitemapDiff {
    /// `true` when both trees have the same paths and types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_paths.is_empty() && self.removed_paths.is_empty() && self.retyped.is_empty()
    }
}

type PathTypes<'a> = BTreeMap<&'a str, PageType>;

fn path_types(root: &SitemapNode) -> PathTypes<'_> {
    let mut paths = BTreeMap::new();
    root.walk(&mut |node, _| {
        paths.entry(node.path.as_str()).or_insert(node.page_type);
    });
    paths
}

/// Paths of `left` that `right` lacks, in path order.
fn missing_from(left: &PathTypes, right: &PathTypes) -> Vec<String> {
    left.keys()
        .filter(|p| !right.contains_key(*p))
        .map(|p| (*p).to_string())
        .collect()
}

/// Compute differences between a current and a recommended tree.
///
/// Output lists are sorted by path.
#[must_use]
pub fn diff_trees(current: &SitemapNode, recommended: &SitemapNode) -> SitemapDiff {
    let old = path_types(current);
    let new = path_types(recommended);

    let added_paths = missing_from(&new, &old);
    let removed_paths = missing_from(&old, &new);
    let retyped = new
        .iter()
        .filter_map(|(path, &to)| {
            let from = *old.get(path)?;
            (from != to).then(|| PageTypeChange {
                path: (*path).to_string(),
                from,
                to,
            })
        })
        .collect();

    SitemapDiff {
        added_paths,
        removed_paths,
        retyped,
    }
}

/// Format a `SitemapDiff` for human-readable display.
#[must_use]
pub fn format_diff(diff: &SitemapDiff) -> String {
    if diff.is_empty() {
        return "No structural changes.".to_string();
    }

    let mut lines = Vec::new();

    if !diff.added_paths.is_empty() {
        lines.push("Added pages:".to_string());
        for p in &diff.added_paths {
            lines.push(format!("  + {p}"));
        }
    }
    if !diff.removed_paths.is_empty() {
        lines.push("Removed pages:".to_string());
        for p in &diff.removed_paths {
            lines.push(format!("  - {p}"));
        }
    }
    if !diff.retyped.is_empty() {
        lines.push("Retyped pages:".to_string());
        for change in &diff.retyped {
            lines.push(format!(
                "  ~ {}: {} -> {}",
                change.path,
                change.from.as_str(),
                change.to.as_str()
            ));
        }
    }

    lines.join("\n")
}
