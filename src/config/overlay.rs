//! Overlay initialization options
//!
//! Every field is optional on the wire; missing fields fall back to the
//! defaults below, so a host can pass `{}` or a partial JSON object.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{overlay, storage, validation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    // Enable conditions
    /// Always attach (not recommended outside development builds)
    #[serde(default)]
    pub enabled_by_default: bool,
    #[serde(default = "default_true")]
    pub enabled_on_localhost: bool,
    #[serde(default = "default_true")]
    pub enabled_on_param: bool,
    #[serde(default = "default_query_param")]
    pub query_param: String,

    // Storage keys
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_storage_pos_key")]
    pub storage_pos_key: String,
    #[serde(default = "default_storage_size_key")]
    pub storage_size_key: String,
    #[serde(default = "default_storage_open_key")]
    pub storage_open_key: String,

    // UI
    #[serde(default = "default_fab_text")]
    pub fab_text: String,
    #[serde(default = "default_title_text")]
    pub title_text: String,
    #[serde(default = "default_min_width")]
    pub min_width: f64,
    #[serde(default = "default_min_height")]
    pub min_height: f64,
    #[serde(default = "default_max_width_pct")]
    pub max_width_pct: f64,
    #[serde(default = "default_max_height_pct")]
    pub max_height_pct: f64,

    // Helpers
    #[serde(default = "default_true")]
    pub three_finger_open: bool,
    /// Only consulted when no open state has been saved yet
    #[serde(default)]
    pub start_open: bool,
}

/// Borrowed view of the four storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKeys<'a> {
    pub css: &'a str,
    pub position: &'a str,
    pub size: &'a str,
    pub open: &'a str,
}

fn default_true() -> bool {
    true
}

fn default_query_param() -> String {
    overlay::QUERY_PARAM.to_string()
}

fn default_storage_key() -> String {
    storage::CSS_KEY.to_string()
}

fn default_storage_pos_key() -> String {
    storage::POSITION_KEY.to_string()
}

fn default_storage_size_key() -> String {
    storage::SIZE_KEY.to_string()
}

fn default_storage_open_key() -> String {
    storage::OPEN_KEY.to_string()
}

fn default_fab_text() -> String {
    overlay::FAB_TEXT.to_string()
}

fn default_title_text() -> String {
    overlay::TITLE_TEXT.to_string()
}

fn default_min_width() -> f64 {
    overlay::MIN_WIDTH
}

fn default_min_height() -> f64 {
    overlay::MIN_HEIGHT
}

fn default_max_width_pct() -> f64 {
    overlay::MAX_WIDTH_PCT
}

fn default_max_height_pct() -> f64 {
    overlay::MAX_HEIGHT_PCT
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: false,
            enabled_on_localhost: true,
            enabled_on_param: true,
            query_param: default_query_param(),
            storage_key: default_storage_key(),
            storage_pos_key: default_storage_pos_key(),
            storage_size_key: default_storage_size_key(),
            storage_open_key: default_storage_open_key(),
            fab_text: default_fab_text(),
            title_text: default_title_text(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            max_width_pct: default_max_width_pct(),
            max_height_pct: default_max_height_pct(),
            three_finger_open: true,
            start_open: false,
        }
    }
}

impl OverlayConfig {
    /// Parse a JSON options object, then sanitise it
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate_and_clamp();
        Ok(config)
    }

    pub fn keys(&self) -> StorageKeys<'_> {
        StorageKeys {
            css: &self.storage_key,
            position: &self.storage_pos_key,
            size: &self.storage_size_key,
            open: &self.storage_open_key,
        }
    }

    /// Id of the live override style element, derived from the CSS storage key
    pub fn style_element_id(&self) -> String {
        let escaped: String = self
            .storage_key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        format!("{}{}", overlay::STYLE_ELEMENT_ID_PREFIX, escaped)
    }

    /// Validate and clamp sizing values to safe ranges
    pub fn validate_and_clamp(&mut self) {
        use validation::{MAX_DIMENSION, MIN_DIMENSION};

        for (name, value, fallback) in [
            ("minWidth", &mut self.min_width, overlay::MIN_WIDTH),
            ("minHeight", &mut self.min_height, overlay::MIN_HEIGHT),
        ] {
            if !value.is_finite() || *value < MIN_DIMENSION {
                warn!(option = name, value = *value, using = fallback, "dimension below minimum, using default");
                *value = fallback;
            } else if *value > MAX_DIMENSION {
                warn!(option = name, value = *value, max = MAX_DIMENSION, "dimension exceeds maximum, clamping");
                *value = MAX_DIMENSION;
            }
        }

        for (name, value, fallback) in [
            ("maxWidthPct", &mut self.max_width_pct, overlay::MAX_WIDTH_PCT),
            ("maxHeightPct", &mut self.max_height_pct, overlay::MAX_HEIGHT_PCT),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                warn!(option = name, value = *value, using = fallback, "viewport fraction not positive, using default");
                *value = fallback;
            } else if *value > 1.0 {
                warn!(option = name, value = *value, "viewport fraction exceeds 1, clamping");
                *value = 1.0;
            }
        }
    }
}
