//! Pointer sessions: reposition (drag by the title bar) and resize (corner handle)
//!
//! A session exists only between pointer-down and pointer-up. It remembers the
//! anchor captured at pointer-down; every move recomputes the live value from
//! that anchor, so the last move before pointer-up decides what is committed.

use crate::constants::layout::{FAB_RESERVE, MIN_EDGE_OFFSET};
use crate::types::{PanelSize, Point, Position, Rect, Viewport, clamp};

pub type PointerId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Reposition,
    Resize,
}

/// Clamp limits for the panel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width_pct: f64,
    pub max_height_pct: f64,
}

/// The single active session slot holds one of these
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Reposition {
        pointer_id: PointerId,
        start: Point,
        start_right: f64,
        start_bottom: f64,
        /// Live position before the session, restored if it is abandoned
        previous: Option<Position>,
    },
    Resize {
        pointer_id: PointerId,
        start: Point,
        start_width: f64,
        start_height: f64,
        previous: Option<PanelSize>,
    },
}

impl Session {
    /// Anchor a drag to the right/bottom viewport edges of `overlay_rect`
    pub fn reposition(
        pointer_id: PointerId,
        start: Point,
        overlay_rect: Rect,
        viewport: Viewport,
        previous: Option<Position>,
    ) -> Self {
        Session::Reposition {
            pointer_id,
            start,
            start_right: viewport.width - overlay_rect.right(),
            start_bottom: viewport.height - overlay_rect.bottom(),
            previous,
        }
    }

    pub fn resize(pointer_id: PointerId, start: Point, panel_rect: Rect, previous: Option<PanelSize>) -> Self {
        Session::Resize {
            pointer_id,
            start,
            start_width: panel_rect.width,
            start_height: panel_rect.height,
            previous,
        }
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            Session::Reposition { .. } => SessionKind::Reposition,
            Session::Resize { .. } => SessionKind::Resize,
        }
    }

    pub fn pointer_id(&self) -> PointerId {
        match self {
            Session::Reposition { pointer_id, .. } | Session::Resize { pointer_id, .. } => *pointer_id,
        }
    }
}

/// Right/bottom offsets after moving the pointer by `delta`, kept inside
/// `[6, dimension - 56]` on each axis
pub fn repositioned(start_right: f64, start_bottom: f64, delta: Point, viewport: Viewport) -> (f64, f64) {
    let right = clamp(start_right - delta.x, MIN_EDGE_OFFSET, viewport.width - FAB_RESERVE);
    let bottom = clamp(start_bottom - delta.y, MIN_EDGE_OFFSET, viewport.height - FAB_RESERVE);
    (right, bottom)
}

/// Panel size after moving the handle by `delta`, kept inside
/// `[min, dimension * max_pct]` on each axis
pub fn resized(start_width: f64, start_height: f64, delta: Point, viewport: Viewport, limits: &SizeLimits) -> (f64, f64) {
    let width = clamp(start_width + delta.x, limits.min_width, viewport.width * limits.max_width_pct);
    let height = clamp(start_height + delta.y, limits.min_height, viewport.height * limits.max_height_pct);
    (width, height)
}

pub fn delta(start: Point, current: Point) -> Point {
    Point::new(current.x - start.x, current.y - start.y)
}
