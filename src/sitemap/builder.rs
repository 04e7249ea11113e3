//! Tree construction from flat page lists.

use std::collections::{BTreeMap, HashMap};

use url::Url;

use super::classify::classify;
use super::{PageType, ScrapedPage, SitemapData, SitemapNode, SitemapNodeMetadata};
use crate::error::{Error, Result};
use crate::ports::{Clock, IdGenerator};

/// Builds sitemap trees, stamping them through the clock and id ports.
pub struct SitemapBuilder<'a> {
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
}

/// A kept input page, keyed by its normalized path.
struct Seed<'p> {
    url: &'p str,
    title: Option<&'p str>,
}

impl<'a> SitemapBuilder<'a> {
    /// Creates a builder over the given ports.
    #[must_use]
    pub fn new(clock: &'a dyn Clock, ids: &'a dyn IdGenerator) -> Self {
        Self { clock, ids }
    }

    /// Builds the current tree from scraped page rows.
    ///
    /// Pages on other hosts, or with unparseable URLs, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `project_url` cannot be parsed.
    pub fn build_from_scraped_pages(
        &self,
        pages: &[ScrapedPage],
        project_url: &str,
    ) -> Result<SitemapData> {
        let seeds = pages.iter().map(|p| (p.url.as_str(), p.title.as_deref()));
        self.build(seeds, project_url, true)
    }

    /// Builds a tree from URLs listed in a sitemap; no node has content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `project_url` cannot be parsed.
    pub fn build_from_url_list(&self, urls: &[String], project_url: &str) -> Result<SitemapData> {
        let seeds = urls.iter().map(|u| (u.as_str(), None));
        self.build(seeds, project_url, false)
    }

    fn build<'p>(
        &self,
        inputs: impl Iterator<Item = (&'p str, Option<&'p str>)>,
        project_url: &str,
        scraped: bool,
    ) -> Result<SitemapData> {
        let project = match Url::parse(project_url) {
            Ok(project) => project,
            Err(source) => {
                return Err(Error::InvalidUrl {
                    url: project_url.to_string(),
                    source,
                });
            }
        };
        let host = project.host_str().unwrap_or_default().to_string();
        let origin = project.origin().ascii_serialization();

        let mut seeds: BTreeMap<String, Seed<'p>> = BTreeMap::new();
        for (url, title) in inputs {
            let parsed = match Url::parse(url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::debug!("skipping unparseable page URL {url:?}: {e}");
                    continue;
                }
            };
            if parsed.host_str().unwrap_or_default() != host {
                log::debug!("skipping off-site page {url}");
                continue;
            }
            let path = normalize_path(parsed.path()).to_string();
            seeds.entry(path).or_insert(Seed { url, title });
        }

        let root_seed = seeds.get("/");
        let mut root = SitemapNode {
            id: self.ids.generate_id(),
            label: host,
            path: "/".to_string(),
            url: Some(project_url.to_string()),
            page_type: PageType::Homepage,
            has_content: scraped && root_seed.is_some(),
            children: Vec::new(),
            metadata: SitemapNodeMetadata {
                title: root_seed.and_then(|s| s.title).map(String::from),
                ..SitemapNodeMetadata::default()
            },
        };

        let mut arena = Arena::default();
        for path in seeds.keys().filter(|p| p.as_str() != "/") {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            let mut parent = None;
            for depth in 1..=segments.len() {
                let prefix = format!("/{}", segments[..depth].join("/"));
                let seed = seeds.get(&prefix);
                let url = seed.map_or_else(|| format!("{origin}{prefix}"), |s| s.url.to_string());
                let node = || SitemapNode {
                    id: self.ids.generate_id(),
                    label: label_for(segments[depth - 1]),
                    path: prefix.clone(),
                    url: Some(url),
                    page_type: classify(&prefix),
                    has_content: scraped && seed.is_some(),
                    children: Vec::new(),
                    metadata: SitemapNodeMetadata {
                        title: seed.and_then(|s| s.title).map(String::from),
                        ..SitemapNodeMetadata::default()
                    },
                };
                parent = Some(arena.ensure(prefix.clone(), parent, node));
            }
        }
        arena.attach_to(&mut root);

        let (total_pages, max_depth) = root.stats();
        log::debug!("built sitemap for {project_url}: {total_pages} node(s), depth {max_depth}");
        Ok(SitemapData {
            root_node: root,
            total_pages,
            max_depth,
            generated_at: self.clock.now(),
            project_url: project_url.to_string(),
            ai_rationale: None,
            key_changes: None,
        })
    }
}

/// Flat node storage during construction; `parents[i]` is `None` for
/// children of the root.
#[derive(Default)]
struct Arena {
    nodes: Vec<SitemapNode>,
    parents: Vec<Option<usize>>,
    by_path: HashMap<String, usize>,
}

impl Arena {
    /// Returns the node for `path`, creating it under `parent` if missing.
    fn ensure(
        &mut self,
        path: String,
        parent: Option<usize>,
        make: impl FnOnce() -> SitemapNode,
    ) -> usize {
        if let Some(&index) = self.by_path.get(&path) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(make());
        self.parents.push(parent);
        self.by_path.insert(path, index);
        index
    }

    /// Moves every node into its parent, preserving creation order among siblings.
    ///
    /// Children always have higher indices than their parent, so popping from
    /// the back sees every child before its parent.
    fn attach_to(mut self, root: &mut SitemapNode) {
        while let Some(mut node) = self.nodes.pop() {
            let index = self.nodes.len();
            node.children.reverse();
            match self.parents[index] {
                Some(parent) => self.nodes[parent].children.push(node),
                None => root.children.push(node),
            }
        }
        root.children.reverse();
    }
}

/// Strips one trailing slash; the root stays `/`.
fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some("") | None => {
            if path.is_empty() {
                "/"
            } else {
                path
            }
        }
        Some(stripped) => stripped,
    }
}

/// Hyphens become spaces and each word starts upper-case.
fn label_for(segment: &str) -> String {
    let mut label = String::with_capacity(segment.len());
    let mut at_word_start = true;
    for ch in segment.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && at_word_start {
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
        at_word_start = !is_word;
    }
    label
}
