//! `sitemap.xml` import with one level of sitemap-index resolution.

use std::sync::Arc;

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fetch::fetch_all;
use crate::ports::HttpClient;

/// URLs gathered from a sitemap, with per-child failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapImport {
    /// Page URLs in document order.
    pub urls: Vec<String>,
    /// Number of child sitemaps listed by an index (0 for a plain urlset).
    pub child_sitemaps_found: usize,
    /// One `"<child url>: <reason>"` entry per child that could not be read.
    pub errors: Vec<String>,
}

/// A parsed sitemap document.
#[derive(Debug, PartialEq, Eq)]
enum Document {
    /// `<sitemapindex>`: child sitemap locations.
    Index(Vec<String>),
    /// `<urlset>` (or any other root): page locations.
    UrlSet(Vec<String>),
}

/// Imports the page URLs listed by `sitemap_url`.
///
/// An index is resolved one level deep: every child sitemap is fetched in
/// batches of `batch_size` and their URLs are concatenated in child order.
/// A child that cannot be fetched or parsed adds one entry to `errors` and
/// does not abort the import.
///
/// # Errors
///
/// Returns an error if the top-level document cannot be fetched, comes back
/// with a non-2xx status, or is not well-formed XML.
pub async fn import_sitemap(
    http: &Arc<dyn HttpClient>,
    sitemap_url: &str,
    batch_size: usize,
) -> Result<SitemapImport> {
    let response = match http.get(sitemap_url).await {
        Ok(response) => response,
        Err(e) => {
            return Err(Error::Fetch {
                url: sitemap_url.to_string(),
                message: e.to_string(),
            });
        }
    };
    if !response.is_success() {
        return Err(Error::HttpStatus {
            url: sitemap_url.to_string(),
            status: response.status,
        });
    }
    let document = match parse_document(&response.body) {
        Ok(document) => document,
        Err(message) => {
            return Err(Error::SitemapXml {
                url: sitemap_url.to_string(),
                message,
            });
        }
    };

    let children = match document {
        Document::UrlSet(urls) => {
            log::info!("{sitemap_url}: {} url(s)", urls.len());
            return Ok(SitemapImport {
                urls,
                ..SitemapImport::default()
            });
        }
        Document::Index(children) => children,
    };

    log::info!(
        "{sitemap_url} is a sitemap index with {} child sitemap(s)",
        children.len()
    );
    let mut import = SitemapImport {
        child_sitemaps_found: children.len(),
        ..SitemapImport::default()
    };
    let outcomes = fetch_all(http, &children, batch_size).await;
    for (child, outcome) in children.iter().zip(outcomes) {
        let result = outcome.and_then(|response| {
            if !response.is_success() {
                return Err(format!("HTTP {}", response.status));
            }
            match parse_document(&response.body)? {
                Document::UrlSet(urls) => Ok(urls),
                Document::Index(_) => Err("nested sitemap index not followed".to_string()),
            }
        });
        match result {
            Ok(urls) => import.urls.extend(urls),
            Err(reason) => {
                log::warn!("child sitemap {child} skipped: {reason}");
                import.errors.push(format!("{child}: {reason}"));
            }
        }
    }
    Ok(import)
}

/// Parses a sitemap or sitemap index.
///
/// Only `<loc>` elements directly inside `<url>` or `<sitemap>` count, so
/// extension entries such as `<image:loc>` are ignored. Namespace prefixes
/// are ignored.
fn parse_document(xml: &str) -> Result<Document, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut is_index = false;
    let mut locs = Vec::new();
    let mut text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if stack.is_empty() {
                    is_index = name == b"sitemapindex";
                }
                if name == b"loc"
                    && matches!(stack.last().map(Vec::as_slice), Some(b"url" | b"sitemap"))
                {
                    text = Some(String::new());
                }
                stack.push(name);
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"loc" {
                    if let Some(raw) = text.take() {
                        let loc = unescape(raw.trim()).map_err(|err| err.to_string())?;
                        if !loc.is_empty() {
                            locs.push(loc.into_owned());
                        }
                    }
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(buf) = text.as_mut() {
                    // CDATA is literal; escape `&` so the final unescape leaves it intact.
                    buf.push_str(&String::from_utf8_lossy(&t).replace('&', "&amp;"));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(buf) = text.as_mut() {
                    buf.push('&');
                    buf.push_str(&String::from_utf8_lossy(&r));
                    buf.push(';');
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("at position {}: {e}", reader.error_position())),
        }
    }

    if is_index {
        Ok(Document::Index(locs))
    } else {
        Ok(Document::UrlSet(locs))
    }
}
