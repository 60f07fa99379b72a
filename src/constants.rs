//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the crate, providing a single source of truth for constant values.

/// Overlay placement constants (all values in CSS pixels)
pub mod layout {
    /// Default distance of the overlay from the right and bottom viewport edges
    pub const DEFAULT_EDGE_OFFSET: f64 = 14.0;

    /// Smallest allowed distance from a viewport edge while dragging
    pub const MIN_EDGE_OFFSET: f64 = 6.0;

    /// Space kept free on the far side so the toggle button stays reachable
    pub const FAB_RESERVE: f64 = 56.0;

    /// Panel size written on commit when no live size was applied
    pub const FALLBACK_PANEL_SIZE: &str = "420px";
}

/// Overlay configuration defaults
pub mod overlay {
    pub const QUERY_PARAM: &str = "livecss";

    pub const FAB_TEXT: &str = "\u{1F3A8}";
    pub const TITLE_TEXT: &str = "Live CSS";

    pub const MIN_WIDTH: f64 = 240.0;
    pub const MIN_HEIGHT: f64 = 180.0;
    pub const MAX_WIDTH_PCT: f64 = 0.95;
    pub const MAX_HEIGHT_PCT: f64 = 0.75;

    /// Number of simultaneous touch points that force the panel open
    pub const OPEN_GESTURE_TOUCHES: usize = 3;

    /// Prefix of the id given to the live override style element
    pub const STYLE_ELEMENT_ID_PREFIX: &str = "live-css-style-";
}

/// Storage key defaults (per-project override recommended)
pub mod storage {
    pub const CSS_KEY: &str = "live_css_v1";
    pub const POSITION_KEY: &str = "live_css_pos_v1";
    pub const SIZE_KEY: &str = "live_css_size_v1";
    pub const OPEN_KEY: &str = "live_css_open_v1";

    /// Stored value of the open flag when the panel is open
    pub const OPEN: &str = "1";
    /// Stored value of the open flag when the panel is closed
    pub const CLOSED: &str = "0";

    /// Directory under the user config dir holding the file store
    pub const APP_DIR: &str = "live-css";
    pub const FILENAME: &str = "storage.json";
}

/// Rule extraction defaults
pub mod extract {
    /// Default include pattern: a sheet literally named `style.css`
    pub const DEFAULT_INCLUDE: &str = r"(?i)style\.css(\?|$)";

    /// Safety cap on the number of rules emitted by one extraction
    pub const DEFAULT_MAX_RULES: usize = 200;

    /// Output when nothing matched (or no sheet was readable)
    pub const NO_MATCH_SENTINEL: &str =
        "/* No matching STYLE_RULE rules found (or sheet not accessible). */";

    /// Marker of a pseudo-element; such selectors never match an element node
    pub const PSEUDO_ELEMENT_MARKER: &str = "::";
}

/// Enablement gate constants
pub mod gate {
    /// Host names treated as local development
    pub const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

    /// Query values (compared case-insensitively) that enable the overlay
    pub const TRUTHY_VALUES: [&str; 4] = ["1", "true", "yes", "on"];
}

/// Validation limits applied to loaded configuration
pub mod validation {
    pub const MIN_DIMENSION: f64 = 1.0;
    pub const MAX_DIMENSION: f64 = 8192.0;
}
