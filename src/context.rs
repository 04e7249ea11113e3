//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveHttpClient, LiveIdGenerator};
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingHttpClient, RecordingIdGenerator,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingHttpClient, ReplayingIdGenerator,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::http::{HttpClient, HttpFuture};
use crate::ports::id_gen::IdGenerator;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock for detection and generation timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for the project store and token files.
    pub fs: Box<dyn FileSystem>,
    /// ID generator for sitemap node ids.
    pub id_gen: Box<dyn IdGenerator>,
    /// HTTP client, shared with concurrent fetch tasks.
    pub http: Arc<dyn HttpClient>,
}

impl ServiceContext {
    /// Creates a live context with real adapters for every port.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(settings: &Settings) -> Result<Self, String> {
        Ok(Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            http: Arc::new(live_http(settings)?),
        })
    }

    /// Creates a recording context backed by live adapters.
    ///
    /// Every port interaction is captured into a per-port cassette under a
    /// timestamped directory inside `base`. Drop the context before calling
    /// [`RecordingSession::finish`] so the recorders are released.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory or HTTP client cannot be created.
    pub fn recording_at(
        base: impl Into<PathBuf>,
        settings: &Settings,
    ) -> Result<(Self, RecordingSession), String> {
        let base = base.into();
        let session = RecordingSession::new(&base)?;
        let ctx = Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            fs: Box::new(RecordingFileSystem::new(
                Box::new(LiveFileSystem),
                Arc::clone(&session.fs),
            )),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator),
                Arc::clone(&session.id_gen),
            )),
            http: Arc::new(RecordingHttpClient::new(
                Arc::new(live_http(settings)?),
                Arc::clone(&session.http),
            )),
        };
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// All ports are served by a single cassette; each port/method pair
    /// is dispatched to the right interaction stream automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        // Separate replayers keep per-port cursors independent.
        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(&cassette))),
            http: Arc::new(ReplayingHttpClient::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette file use a panicking adapter that
    /// fails with a clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
            http: match replayers.http {
                Some(r) => Arc::new(ReplayingHttpClient::new(r)),
                None => Arc::new(PanickingHttpClient),
            },
        })
    }
}

fn live_http(settings: &Settings) -> Result<LiveHttpClient, String> {
    LiveHttpClient::new(settings.http_timeout, &settings.user_agent)
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}

// --- Panicking adapters for unspecified ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig: no cassette loaded for clock");
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn exists(&self, _path: &Path) -> bool {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
    fn list_dir(
        &self,
        _path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("FileSystem port not configured in CassetteConfig: no cassette loaded for fs");
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        panic!("IdGenerator port not configured in CassetteConfig: no cassette loaded for id_gen");
    }
}

struct PanickingHttpClient;
impl HttpClient for PanickingHttpClient {
    fn get(&self, _url: &str) -> HttpFuture<'_> {
        panic!("HttpClient port not configured in CassetteConfig: no cassette loaded for http");
    }
}
