use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::StorageKeys;
use crate::constants::storage;
use crate::store::ConfigStore;
use crate::types::{PanelSize, Position};

/// Overlay state as found in storage at attach time.
/// Each record is loaded independently; `None` means no (usable) record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedState {
    pub css: Option<String>,
    pub open: Option<bool>,
    pub position: Option<Position>,
    pub size: Option<PanelSize>,
}

impl SavedState {
    pub fn load(store: &impl ConfigStore, keys: StorageKeys<'_>) -> Self {
        let state = Self {
            css: store.load(keys.css),
            open: store.load(keys.open).map(|value| value == storage::OPEN),
            position: load_json(store, keys.position),
            size: load_json(store, keys.size),
        };
        info!(
            css_len = state.css.as_ref().map_or(0, String::len),
            open = ?state.open,
            position = ?state.position,
            size = ?state.size,
            "Loaded saved overlay state"
        );
        state
    }

    /// Initial open state
    /// Priority: saved flag (either value) > boot preference
    pub fn is_open(&self, start_open: bool) -> bool {
        self.open.unwrap_or(start_open)
    }
}

/// Decode a JSON layout record; malformed data counts as absent
fn load_json<T: DeserializeOwned>(store: &impl ConfigStore, key: &str) -> Option<T> {
    let raw = store.load(key)?;
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Ignoring malformed layout record");
            None
        }
    }
}

fn save_json<T: Serialize>(store: &mut impl ConfigStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("Failed to serialize layout record")?;
    store
        .save(key, &json)
        .context(format!("Failed to save layout record '{}'", key))
}

pub fn save_open(store: &mut impl ConfigStore, keys: StorageKeys<'_>, open: bool) -> Result<()> {
    let value = if open { storage::OPEN } else { storage::CLOSED };
    store
        .save(keys.open, value)
        .context("Failed to save open state")
}

pub fn save_position(store: &mut impl ConfigStore, keys: StorageKeys<'_>, position: &Position) -> Result<()> {
    save_json(store, keys.position, position)
}

pub fn save_size(store: &mut impl ConfigStore, keys: StorageKeys<'_>, size: &PanelSize) -> Result<()> {
    save_json(store, keys.size, size)
}

pub fn save_css(store: &mut impl ConfigStore, keys: StorageKeys<'_>, css: &str) -> Result<()> {
    store.save(keys.css, css).context("Failed to save CSS text")
}

pub fn clear_css(store: &mut impl ConfigStore, keys: StorageKeys<'_>) -> Result<()> {
    store.clear(keys.css).context("Failed to clear CSS text")
}

/// Drop every layout record (position, size and open flag)
pub fn clear_layout(store: &mut impl ConfigStore, keys: StorageKeys<'_>) -> Result<()> {
    for key in [keys.position, keys.size, keys.open] {
        store
            .clear(key)
            .context(format!("Failed to clear layout record '{}'", key))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_empty_store() {
        let config = OverlayConfig::default();
        let state = SavedState::load(&MemoryStore::new(), config.keys());
        assert_eq!(state, SavedState::default());
        assert!(!state.is_open(false));
        assert!(state.is_open(true));
    }

    #[test]
    fn test_saved_closed_beats_start_open() {
        let config = OverlayConfig::default();
        let mut store = MemoryStore::new();
        save_open(&mut store, config.keys(), false).unwrap();

        let state = SavedState::load(&store, config.keys());
        assert_eq!(state.open, Some(false));
        assert!(!state.is_open(true));
    }

    #[test]
    fn test_unknown_open_value_reads_as_closed() {
        let config = OverlayConfig::default();
        let mut store = MemoryStore::new();
        store.save(config.keys().open, "true").unwrap();

        let state = SavedState::load(&store, config.keys());
        assert!(!state.is_open(true));
    }

    #[test]
    fn test_layout_records_roundtrip() {
        let config = OverlayConfig::default();
        let mut store = MemoryStore::new();
        save_position(&mut store, config.keys(), &Position::from_px(40.0, 60.0)).unwrap();
        save_size(&mut store, config.keys(), &PanelSize::from_px(300.0, 250.0)).unwrap();

        assert_eq!(
            store.load(config.keys().position).as_deref(),
            Some(r#"{"right":"40px","bottom":"60px"}"#)
        );

        let state = SavedState::load(&store, config.keys());
        assert_eq!(state.position, Some(Position::from_px(40.0, 60.0)));
        assert_eq!(state.size, Some(PanelSize::from_px(300.0, 250.0)));
    }

    #[test]
    fn test_malformed_layout_is_ignored_independently() {
        let config = OverlayConfig::default();
        let mut store = MemoryStore::new();
        store.save(config.keys().position, "{not json").unwrap();
        store.save(config.keys().size, r#"{"w":"300px","h":"200px"}"#).unwrap();
        store.save(config.keys().css, "a { color: red; }").unwrap();

        let state = SavedState::load(&store, config.keys());
        assert_eq!(state.position, None);
        assert_eq!(state.size, Some(PanelSize::from_px(300.0, 200.0)));
        assert_eq!(state.css.as_deref(), Some("a { color: red; }"));
    }

    #[test]
    fn test_clear_layout_keeps_css() {
        let config = OverlayConfig::default();
        let keys = config.keys();
        let mut store = MemoryStore::new();
        save_css(&mut store, keys, "b{}").unwrap();
        save_open(&mut store, keys, true).unwrap();
        save_position(&mut store, keys, &Position::default()).unwrap();
        save_size(&mut store, keys, &PanelSize::from_px(1.0, 1.0)).unwrap();

        clear_layout(&mut store, keys).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(keys.css).as_deref(), Some("b{}"));

        clear_css(&mut store, keys).unwrap();
        assert!(store.is_empty());
    }
}
