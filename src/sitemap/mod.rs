//! Hierarchical sitemap trees: construction, annotation, diffing and XML import.
//!
//! A tree is rooted at the site's homepage (`/`). Every other node is one
//! path segment deeper than its parent; ancestors that were never observed
//! directly are synthesized so the hierarchy has no gaps.

pub mod annotate;
pub mod builder;
pub mod classify;
pub mod diff;
pub mod import;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use annotate::{annotation_summary, find_node, mark_scraped, render_outline, AnnotationSummary};
pub use builder::SitemapBuilder;
pub use diff::{diff_trees, format_diff, SitemapDiff};
pub use import::{import_sitemap, SitemapImport};

/// Page category inferred from a node's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// The site root.
    Homepage,
    /// A product collection or the collections index.
    Collection,
    /// A single product.
    Product,
    /// A static content page.
    Page,
    /// A blog or the blogs index.
    Blog,
    /// A blog post.
    Article,
    /// Anything else.
    Other,
}

impl PageType {
    /// Lower-case name as used in persisted JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Collection => "collection",
            Self::Product => "product",
            Self::Page => "page",
            Self::Blog => "blog",
            Self::Article => "article",
            Self::Other => "other",
        }
    }
}

/// Priority assigned by a recommender.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must-have page.
    High,
    /// Should-have page.
    Medium,
    /// Nice-to-have page.
    Low,
}

impl Priority {
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

/// Optional per-node annotations.
///
/// The builder only ever sets `title`; `page_id` is set by
/// [`mark_scraped`] and the rest come from a recommended tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNodeMetadata {
    /// Title of the scraped page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Id of the stored page backing this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    /// Recommended priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Node is proposed as new.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    /// Node is proposed for removal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_removed: Option<bool>,
    /// Node was moved from another location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_moved: Option<bool>,
    /// Previous path of a moved node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_from: Option<String>,
    /// Free-form recommender notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One node of a sitemap tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapNode {
    /// Unique id within the tree.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Absolute path, no trailing slash except for the root `/`.
    pub path: String,
    /// Page URL, scraped or synthesized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Inferred page category.
    pub page_type: PageType,
    /// Whether the page has been scraped.
    pub has_content: bool,
    /// Child nodes in first-seen order.
    #[serde(default)]
    pub children: Vec<SitemapNode>,
    /// Annotations.
    #[serde(default)]
    pub metadata: SitemapNodeMetadata,
}

impl SitemapNode {
    /// Depth-first pre-order traversal with each node's depth (root = 0).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SitemapNode, usize)) {
        fn go<'a>(
            node: &'a SitemapNode,
            depth: usize,
            visit: &mut impl FnMut(&'a SitemapNode, usize),
        ) {
            visit(node, depth);
            for child in &node.children {
                go(child, depth + 1, visit);
            }
        }
        go(self, 0, visit);
    }

    /// Node count and maximum depth of the subtree rooted here.
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        let mut count = 0;
        let mut max_depth = 0;
        self.walk(&mut |_, depth| {
            count += 1;
            max_depth = max_depth.max(depth);
        });
        (count, max_depth)
    }
}

/// A complete sitemap as persisted per project and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapData {
    /// Root node (`/`).
    pub root_node: SitemapNode,
    /// Number of nodes in the tree.
    pub total_pages: usize,
    /// Deepest node depth, root = 0.
    pub max_depth: usize,
    /// When the tree was built.
    pub generated_at: DateTime<Utc>,
    /// Site the tree describes.
    pub project_url: String,
    /// Recommender's explanation, for recommended trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_rationale: Option<String>,
    /// Recommender's headline changes, for recommended trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_changes: Option<Vec<String>>,
}

/// A scraped page row as kept by the page store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPage {
    /// Page URL.
    pub url: String,
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Extracted page content; not used for tree construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Which of a project's two sitemaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapKind {
    /// Derived from the live site.
    Current,
    /// Proposed by a recommender.
    Recommended,
}

impl SitemapKind {
    /// Lower-case name, also the stored file stem.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Recommended => "recommended",
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub(crate) fn node(id: &str, path: &str, children: Vec<SitemapNode>) -> SitemapNode {
        SitemapNode {
            id: id.into(),
            label: path.rsplit('/').next().unwrap_or_default().to_string(),
            path: path.into(),
            url: None,
            page_type: PageType::Other,
            has_content: false,
            children,
            metadata: SitemapNodeMetadata::default(),
        }
    }

    /// `/` with children `/a` (holding `/a/b`) and `/c`.
    pub(crate) fn sample_tree() -> SitemapNode {
        let a = node("a", "/a", vec![node("ab", "/a/b", vec![])]);
        node("r", "/", vec![a, node("c", "/c", vec![])])
    }

    #[test]
    fn stats_count_nodes_and_depth() {
        assert_eq!(sample_tree().stats(), (4, 2));
        assert_eq!(node("r", "/", vec![]).stats(), (1, 0));
    }

    #[test]
    fn walk_is_preorder() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        tree.walk(&mut |n, depth| seen.push(format!("{}@{depth}", n.id)));
        assert_eq!(seen, vec!["r@0", "a@1", "ab@2", "c@1"]);
    }

    #[test]
    fn node_json_uses_camel_case_and_omits_absent_fields() {
        let mut leaf = node("n1", "/products/mug", vec![]);
        leaf.page_type = PageType::Product;
        leaf.metadata.is_new = Some(true);
        leaf.metadata.priority = Some(Priority::High);
        let value = serde_json::to_value(&leaf).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "n1",
                "label": "mug",
                "path": "/products/mug",
                "pageType": "product",
                "hasContent": false,
                "children": [],
                "metadata": {"priority": "high", "isNew": true}
            })
        );
    }

    #[test]
    fn recommended_tree_deserializes_with_annotations() {
        let data: SitemapData = serde_json::from_value(json!({
            "rootNode": {
                "id": "root", "label": "shop.com", "path": "/", "pageType": "homepage",
                "hasContent": true,
                "children": [{
                    "id": "x", "label": "Guides", "path": "/guides", "pageType": "other",
                    "hasContent": false,
                    "metadata": {"isMoved": true, "movedFrom": "/blogs/guides", "notes": "promote"}
                }]
            },
            "totalPages": 2,
            "maxDepth": 1,
            "generatedAt": "2025-01-01T00:00:00Z",
            "projectUrl": "https://shop.com",
            "aiRationale": "flatter",
            "keyChanges": ["promote guides"]
        }))
        .unwrap();
        let guides = &data.root_node.children[0];
        assert_eq!(guides.metadata.moved_from.as_deref(), Some("/blogs/guides"));
        assert!(guides.children.is_empty());
        assert_eq!(data.key_changes, Some(vec!["promote guides".to_string()]));
    }

    #[test]
    fn scraped_page_optional_fields() {
        let page: ScrapedPage = serde_json::from_value(json!({"url": "https://a.com/x"})).unwrap();
        assert!(page.title.is_none());
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value, json!({"url": "https://a.com/x"}));
    }
}
