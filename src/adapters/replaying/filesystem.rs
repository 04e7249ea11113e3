//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::extract_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self {
            replayer: Mutex::new(replayer),
        }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction("fs", "read_to_string");
            interaction.output.clone()
        };
        extract_result(&output, "fs::read_to_string")
    }

    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction("fs", "write");
            interaction.output.clone()
        };
        extract_result(&output, "fs::write")
    }

    fn exists(&self, _path: &Path) -> bool {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction("fs", "exists");
            interaction.output.clone()
        };
        output
            .as_bool()
            .expect("fs::exists: expected boolean output")
    }

    fn list_dir(
        &self,
        _path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction("fs", "list_dir");
            interaction.output.clone()
        };
        extract_result(&output, "fs::list_dir")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::replaying::tests::make_replayer;
    use crate::cassette::format::Interaction;

    fn fs_call(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: "fs".into(),
            method: method.into(),
            input: json!({"path": "/projects/p1/platform.json"}),
            output,
        }
    }

    #[test]
    fn serves_recorded_reads_and_errors() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            fs_call(0, "read_to_string", json!({"ok": "shopify"})),
            fs_call(1, "read_to_string", json!({"err": "No such file"})),
        ]));
        let path = Path::new("/projects/p1/platform.json");
        assert!(fs.read_to_string(path).unwrap().contains("shopify"));
        let err = fs.read_to_string(path).unwrap_err();
        assert!(err.to_string().contains("No such file"));
    }

    #[test]
    fn serves_exists_write_and_listing() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![
            fs_call(0, "exists", json!(true)),
            fs_call(1, "write", json!({"ok": null})),
            fs_call(2, "list_dir", json!({"ok": ["p1", "p2"]})),
        ]));
        let projects = Path::new("/projects");
        assert!(fs.exists(projects));
        assert!(fs.write(&projects.join("p1/platform.json"), "{}").is_ok());
        assert_eq!(fs.list_dir(projects).unwrap(), vec!["p1", "p2"]);
    }
}
