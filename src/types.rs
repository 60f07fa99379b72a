//! Geometry and persisted layout records shared by the overlay modules

use serde::{Deserialize, Serialize};

use crate::constants::layout;

/// Pointer position in viewport (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box as reported by the host layout, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Inner size of the host window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Persisted overlay position, anchored to the right and bottom viewport edges.
/// Values are CSS lengths such as `"14px"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub right: String,
    pub bottom: String,
}

impl Position {
    pub fn from_px(right: f64, bottom: f64) -> Self {
        Self {
            right: px(right),
            bottom: px(bottom),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::from_px(layout::DEFAULT_EDGE_OFFSET, layout::DEFAULT_EDGE_OFFSET)
    }
}

/// Persisted panel size (`{"w": .., "h": ..}` on disk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSize {
    pub w: String,
    pub h: String,
}

impl PanelSize {
    pub fn from_px(width: f64, height: f64) -> Self {
        Self {
            w: px(width),
            h: px(height),
        }
    }
}

/// Format a pixel length the way script engines stringify numbers:
/// whole values carry no fractional part (`120px`, `120.5px`).
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// `max(lo, min(hi, n))`. When `hi < lo` the lower bound wins.
pub fn clamp(n: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(n))
}
