//! JSON file backed store
//!
//! All records live in one flat JSON object. Every save/clear rewrites the
//! file so state survives a crash between gestures.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::ConfigStore;
use crate::constants::storage;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Default location: `<config_dir>/live-css/storage.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(storage::FILENAME);
        path
    }

    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or corrupt file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    info!(path = %path.display(), records = entries.len(), "Loaded overlay storage");
                    entries
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to parse storage file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write `entries` to a sibling temp file, then rename it over the store
    /// file so a crash mid-write leaves the previous contents intact
    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create storage directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize storage")?;
        let temp = self.temp_path();
        fs::write(&temp, json).context(format!("Failed to write storage file {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .context(format!("Failed to replace storage file {}", self.path.display()))?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// Memory is only updated once the file write succeeded
    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }
}
