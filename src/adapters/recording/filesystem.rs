//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::FileSystem;

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.read_to_string(path);
        let path = path.display().to_string();
        let input = PathInput { path: &path };
        record_result(&self.recorder, "fs", "read_to_string", &input, &result);
        result
    }

    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.write(path, contents);
        let path = path.display().to_string();
        let input = WriteInput {
            path: &path,
            contents,
        };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        let result = self.inner.exists(path);
        let path = path.display().to_string();
        let input = PathInput { path: &path };
        record_interaction(&self.recorder, "fs", "exists", &input, &result);
        result
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.list_dir(path);
        let path = path.display().to_string();
        let input = PathInput { path: &path };
        record_result(&self.recorder, "fs", "list_dir", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::live::LiveFileSystem;
    use crate::adapters::recording::tests::finish_and_load;

    #[test]
    fn records_reads_and_failed_reads() {
        let dir = std::env::temp_dir().join("sitescope_rec_fs_test");
        std::fs::create_dir_all(&dir).unwrap();
        let data = dir.join("platform.json");
        std::fs::write(&data, "{}").unwrap();
        let cassette_path = dir.join("fs.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        {
            let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
            assert!(fs.exists(&data));
            assert_eq!(fs.read_to_string(&data).unwrap(), "{}");
            assert!(fs.read_to_string(&dir.join("missing.json")).is_err());
        }

        let cassette = finish_and_load(recorder, &cassette_path);
        let methods: Vec<&str> = cassette
            .interactions
            .iter()
            .map(|i| i.method.as_str())
            .collect();
        assert_eq!(methods, ["exists", "read_to_string", "read_to_string"]);
        assert_eq!(cassette.interactions[1].output, json!({"ok": "{}"}));
        assert!(cassette.interactions[2].output.get("err").is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
