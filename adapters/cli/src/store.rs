use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use tilegarden_system_persistence::SnapshotStore;

/// Key-value snapshot store persisted as a JSON object on disk.
///
/// Stands in for the browser's localStorage: every write lands in the
/// backing file immediately so an interrupted session still finds its
/// autosave on the next run.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store, loading any existing entries from `path`.
    pub(crate) fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let payload = fs::read_to_string(&path)
                .with_context(|| format!("could not read save file {}", path.display()))?;
            serde_json::from_str(&payload)
                .with_context(|| format!("save file {} is not valid JSON", path.display()))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    fn persist(&self) {
        let payload = serde_json::to_string_pretty(&self.entries)
            .expect("string map serialization never fails");
        if let Err(error) = fs::write(&self.path, payload) {
            log::error!("could not write save file {}: {error}", self.path.display());
        }
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        let _ = self.entries.insert(key.to_owned(), value);
        self.persist();
    }
}
