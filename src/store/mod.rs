//! Project store: persistence for detection results and sitemap trees.
//!
//! Every record is an opaque JSON blob written through the `FileSystem`
//! port. Directory layout:
//!
//! ```text
//! <root>/
//!   └── projects/
//!       └── <project id>/
//!           ├── platform.json
//!           └── sitemaps/
//!               ├── current.json
//!               └── recommended.json
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::platform::PlatformInfo;
use crate::sitemap::{SitemapData, SitemapKind};

/// Persistence layer for per-project records.
///
/// All I/O goes through `ctx.fs` so that the store works with live,
/// replaying, and recording adapters.
pub struct ProjectStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> ProjectStore<'a> {
    /// Creates a new store rooted at the given path.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self {
            ctx,
            root: root.to_path_buf(),
        }
    }

    /// Saves a detection result, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save_platform(&self, project_id: &str, info: &PlatformInfo) -> Result<()> {
        self.write_json(&self.platform_path(project_id), info)
    }

    /// Loads the latest detection result of a project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing was saved, or an error if the
    /// record cannot be read or parsed.
    pub fn load_platform(&self, project_id: &str) -> Result<PlatformInfo> {
        self.read_json(&self.platform_path(project_id), || {
            format!("no platform detected for project {project_id}")
        })
    }

    /// Upserts the sitemap of the given kind; the other kind is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save_sitemap(
        &self,
        project_id: &str,
        kind: SitemapKind,
        data: &SitemapData,
    ) -> Result<()> {
        self.write_json(&self.sitemap_path(project_id, kind), data)
    }

    /// Loads the sitemap of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no sitemap of that kind was saved, or an
    /// error if the record cannot be read or parsed.
    pub fn load_sitemap(&self, project_id: &str, kind: SitemapKind) -> Result<SitemapData> {
        self.read_json(&self.sitemap_path(project_id, kind), || {
            format!("no {} sitemap for project {project_id}", kind.as_str())
        })
    }

    /// Lists the ids of all projects with at least one record, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the projects directory cannot be listed.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        let dir = self.root.join("projects");
        if !self.ctx.fs.exists(&dir) {
            return Ok(Vec::new());
        }
        let mut ids = self
            .ctx
            .fs
            .list_dir(&dir)
            .map_err(|e| Error::io(format!("failed to list {}", dir.display()), &e))?;
        ids.sort();
        Ok(ids)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.ctx
            .fs
            .write(path, &json)
            .map_err(|e| Error::io(format!("failed to write {}", path.display()), &e))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        path: &Path,
        missing: impl FnOnce() -> String,
    ) -> Result<T> {
        if !self.ctx.fs.exists(path) {
            return Err(Error::NotFound(missing()));
        }
        let contents = self
            .ctx
            .fs
            .read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read {}", path.display()), &e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn project_dir(&self, project_id: &str) -> PathBuf {
        self.root.join("projects").join(project_id)
    }

    fn platform_path(&self, project_id: &str) -> PathBuf {
        self.project_dir(project_id).join("platform.json")
    }

    fn sitemap_path(&self, project_id: &str, kind: SitemapKind) -> PathBuf {
        let file = format!("{}.json", kind.as_str());
        self.project_dir(project_id).join("sitemaps").join(file)
    }
}
