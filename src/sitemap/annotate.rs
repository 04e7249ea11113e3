//! Walking and rewriting annotated trees.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::{Priority, SitemapData, SitemapNode};

/// Returns a copy of `node` where the node with id `target_id` is marked as
/// scraped, with `page_id` recorded when given.
///
/// Every other node is copied unchanged; an unknown id yields an identical copy.
#[must_use]
pub fn mark_scraped(node: &SitemapNode, target_id: &str, page_id: Option<&str>) -> SitemapNode {
    let children = node
        .children
        .iter()
        .map(|c| mark_scraped(c, target_id, page_id))
        .collect();
    let mut copy = SitemapNode {
        id: node.id.clone(),
        label: node.label.clone(),
        path: node.path.clone(),
        url: node.url.clone(),
        page_type: node.page_type,
        has_content: node.has_content,
        children,
        metadata: node.metadata.clone(),
    };
    if node.id == target_id {
        copy.has_content = true;
        if let Some(page_id) = page_id {
            copy.metadata.page_id = Some(page_id.to_string());
        }
    }
    copy
}

impl SitemapData {
    /// [`mark_scraped`] applied to the root; stats and metadata are kept.
    #[must_use]
    pub fn mark_scraped(&self, target_id: &str, page_id: Option<&str>) -> Self {
        Self {
            root_node: mark_scraped(&self.root_node, target_id, page_id),
            ..self.clone()
        }
    }
}

/// Finds a node by id.
#[must_use]
pub fn find_node<'a>(root: &'a SitemapNode, id: &str) -> Option<&'a SitemapNode> {
    if root.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_node(child, id))
}

/// Counts of recommender annotations across a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    /// Paths of nodes flagged `isNew`.
    pub new_paths: Vec<String>,
    /// Paths of nodes flagged `isRemoved`.
    pub removed_paths: Vec<String>,
    /// `(moved_from, path)` for nodes flagged `isMoved`.
    pub moved: Vec<(String, String)>,
    /// Paths grouped by priority.
    pub by_priority: BTreeMap<Priority, Vec<String>>,
}

impl AnnotationSummary {
    /// `true` when the tree carries no annotations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_paths.is_empty()
            && self.removed_paths.is_empty()
            && self.moved.is_empty()
            && self.by_priority.is_empty()
    }
}

/// Collects annotations in pre-order.
#[must_use]
pub fn annotation_summary(root: &SitemapNode) -> AnnotationSummary {
    let mut summary = AnnotationSummary::default();
    root.walk(&mut |node, _| {
        let meta = &node.metadata;
        if meta.is_new == Some(true) {
            summary.new_paths.push(node.path.clone());
        }
        if meta.is_removed == Some(true) {
            summary.removed_paths.push(node.path.clone());
        }
        if meta.is_moved == Some(true) {
            let from = meta.moved_from.clone().unwrap_or_else(|| "?".to_string());
            summary.moved.push((from, node.path.clone()));
        }
        if let Some(priority) = meta.priority {
            summary
                .by_priority
                .entry(priority)
                .or_default()
                .push(node.path.clone());
        }
    });
    summary
}

/// Renders a tree as an indented outline, one node per line.
///
/// ```text
/// shop.com / *
///   [+] Guides /guides [high]
///   [~] Faq /pages/faq <- /faq
/// ```
#[must_use]
pub fn render_outline(root: &SitemapNode) -> String {
    let mut out = String::new();
    root.walk(&mut |node, depth| {
        let meta = &node.metadata;
        out.push_str(&"  ".repeat(depth));
        if meta.is_new == Some(true) {
            out.push_str("[+] ");
        } else if meta.is_removed == Some(true) {
            out.push_str("[-] ");
        } else if meta.is_moved == Some(true) {
            out.push_str("[~] ");
        }
        let _ = write!(out, "{} {}", node.label, node.path);
        if node.has_content {
            out.push_str(" *");
        }
        if let Some(priority) = meta.priority {
            let _ = write!(out, " [{}]", priority.as_str());
        }
        if meta.is_moved == Some(true) {
            if let Some(from) = &meta.moved_from {
                let _ = write!(out, " <- {from}");
            }
        }
        out.push('\n');
    });
    out.truncate(out.trim_end().len());
    out
}
