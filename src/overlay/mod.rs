//! The live CSS overlay: open state, editor text and pointer sessions
//!
//! The host shell renders [`OverlayView`] and forwards input to [`Overlay`]
//! (directly or through [`crate::event_handler`]). All state changes that
//! must survive a reload are written to the [`ConfigStore`] immediately,
//! except layout, which is committed once per gesture.

mod boot;
pub mod session;

pub use boot::{Boot, BootError};
pub use session::{PointerId, Session, SessionKind, SizeLimits};

use tracing::{debug, info, warn};

use crate::clipboard::{self, Clipboard, CopyOutcome};
use crate::config::OverlayConfig;
use crate::constants::{layout, overlay};
use crate::persistence::{self, SavedState};
use crate::store::ConfigStore;
use crate::types::{PanelSize, Point, Position, Rect, Viewport};

/// Live visual state of the overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayView {
    pub open: bool,
    /// A reposition session is active (grabbing cursor)
    pub dragging: bool,
    /// Inline right/bottom offsets; `None` leaves the stylesheet default
    pub position: Option<Position>,
    /// Inline panel size; `None` is the natural size
    pub size: Option<PanelSize>,
    /// Text shown in the editor
    pub editor_text: String,
    /// Contents of the live override style element
    pub override_css: String,
}

#[derive(Debug)]
pub struct Overlay<S: ConfigStore> {
    config: OverlayConfig,
    store: S,
    view: OverlayView,
    session: Option<Session>,
}

impl<S: ConfigStore> Overlay<S> {
    /// Build the overlay and restore saved CSS, open state, position and size
    pub fn attach(config: OverlayConfig, store: S) -> Self {
        let saved = SavedState::load(&store, config.keys());
        let css = saved.css.clone().unwrap_or_default();
        let view = OverlayView {
            open: saved.is_open(config.start_open),
            dragging: false,
            position: saved.position,
            size: saved.size,
            editor_text: css.clone(),
            override_css: css,
        };
        info!(open = view.open, style_element = %config.style_element_id(), "Overlay attached");

        Self {
            config,
            store,
            view,
            session: None,
        }
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view.open
    }

    // ---- open state ----

    pub fn set_open(&mut self, open: bool) {
        self.view.open = open;
        if let Err(e) = persistence::save_open(&mut self.store, self.config.keys(), open) {
            warn!(error = ?e, "Failed to persist open state");
        }
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    /// Toggle button
    pub fn toggle(&mut self) {
        self.set_open(!self.view.open);
    }

    /// Touch-start with `touches` simultaneous contact points.
    /// Three fingers force the panel open; the gesture never closes it.
    pub fn touch_start(&mut self, touches: usize) {
        if self.config.three_finger_open && touches == overlay::OPEN_GESTURE_TOUCHES {
            debug!(touches, "Open gesture");
            self.set_open(true);
        }
    }

    // ---- CSS text ----

    pub fn css(&self) -> &str {
        &self.view.editor_text
    }

    pub fn get_css(&self) -> String {
        self.css().to_string()
    }

    /// Replace the editor text, apply it live and save it
    pub fn set_css(&mut self, css: &str) {
        self.view.editor_text = css.to_string();
        self.view.override_css = css.to_string();
        if let Err(e) = persistence::save_css(&mut self.store, self.config.keys(), css) {
            warn!(error = ?e, "Failed to persist CSS text");
        }
    }

    /// Editor input handler; same effect as [`Overlay::set_css`]
    pub fn editor_input(&mut self, text: &str) {
        self.set_css(text);
    }

    /// Empty the editor and override, forget the saved CSS. Layout is untouched.
    pub fn reset_css(&mut self) {
        self.view.editor_text.clear();
        self.view.override_css.clear();
        if let Err(e) = persistence::clear_css(&mut self.store, self.config.keys()) {
            warn!(error = ?e, "Failed to clear CSS text");
        }
    }

    /// Forget position, size and open state and show the defaults again.
    /// An active pointer session ends without committing. The CSS text is
    /// untouched.
    pub fn reset_ui(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(kind = ?session.kind(), pointer = session.pointer_id(), "Pointer session dropped by layout reset");
        }
        self.view.dragging = false;
        if let Err(e) = persistence::clear_layout(&mut self.store, self.config.keys()) {
            warn!(error = ?e, "Failed to clear layout records");
        }
        self.view.position = Some(Position::default());
        self.view.size = None;
        self.view.open = false;
        info!("Overlay layout reset");
    }

    /// Copy button: copy the editor text, falling back to selection copy
    pub fn copy_css(&self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        clipboard::copy_best_effort(clipboard, &self.view.editor_text)
    }

    // ---- pointer sessions ----

    fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            min_width: self.config.min_width,
            min_height: self.config.min_height,
            max_width_pct: self.config.max_width_pct,
            max_height_pct: self.config.max_height_pct,
        }
    }

    /// Start a session, abandoning any stale one whose pointer-up never came
    fn start_session(&mut self, session: Session) {
        if let Some(stale) = self.session.take() {
            warn!(kind = ?stale.kind(), pointer = stale.pointer_id(), "Abandoning unfinished pointer session");
            self.restore(stale);
        }
        debug!(kind = ?session.kind(), pointer = session.pointer_id(), "Pointer session started");
        self.view.dragging = session.kind() == SessionKind::Reposition;
        self.session = Some(session);
    }

    fn restore(&mut self, session: Session) {
        match session {
            Session::Reposition { previous, .. } => self.view.position = previous,
            Session::Resize { previous, .. } => self.view.size = previous,
        }
        self.view.dragging = false;
    }

    /// Pointer-down on the title bar. `overlay_rect` is the overlay's current
    /// bounding box.
    pub fn begin_reposition(&mut self, pointer_id: PointerId, point: Point, overlay_rect: Rect, viewport: Viewport) {
        let previous = self.view.position.clone();
        self.start_session(Session::reposition(pointer_id, point, overlay_rect, viewport, previous));
    }

    /// Pointer-down on the resize handle. `panel_rect` is the panel's current
    /// bounding box.
    pub fn begin_resize(&mut self, pointer_id: PointerId, point: Point, panel_rect: Rect) {
        let previous = self.view.size.clone();
        self.start_session(Session::resize(pointer_id, point, panel_rect, previous));
    }

    /// Apply a pointer move to the active session. Moves from other pointers,
    /// or with no session, are ignored.
    pub fn pointer_move(&mut self, pointer_id: PointerId, point: Point, viewport: Viewport) {
        let limits = self.size_limits();
        match &self.session {
            Some(Session::Reposition { pointer_id: id, start, start_right, start_bottom, .. }) if *id == pointer_id => {
                let (right, bottom) = session::repositioned(*start_right, *start_bottom, session::delta(*start, point), viewport);
                self.view.position = Some(Position::from_px(right, bottom));
            }
            Some(Session::Resize { pointer_id: id, start, start_width, start_height, .. }) if *id == pointer_id => {
                let (width, height) =
                    session::resized(*start_width, *start_height, session::delta(*start, point), viewport, &limits);
                self.view.size = Some(PanelSize::from_px(width, height));
            }
            _ => {}
        }
    }

    /// End the active session and commit its final value
    pub fn pointer_up(&mut self, pointer_id: PointerId) {
        let Some(session) = self.take_session(pointer_id) else {
            return;
        };
        let keys = self.config.keys();
        match session {
            Session::Reposition { .. } => {
                self.view.dragging = false;
                let position = self.view.position.clone().unwrap_or_default();
                info!(right = %position.right, bottom = %position.bottom, "Saving overlay position");
                if let Err(e) = persistence::save_position(&mut self.store, keys, &position) {
                    warn!(error = ?e, "Failed to persist overlay position");
                }
            }
            Session::Resize { .. } => {
                let size = self.view.size.clone().unwrap_or_else(|| PanelSize {
                    w: layout::FALLBACK_PANEL_SIZE.to_string(),
                    h: layout::FALLBACK_PANEL_SIZE.to_string(),
                });
                info!(width = %size.w, height = %size.h, "Saving panel size");
                if let Err(e) = persistence::save_size(&mut self.store, keys, &size) {
                    warn!(error = ?e, "Failed to persist panel size");
                }
            }
        }
    }

    /// Pointer lost without a pointer-up: end the session without committing
    /// and put the pre-session layout back
    pub fn pointer_cancel(&mut self, pointer_id: PointerId) {
        if let Some(session) = self.take_session(pointer_id) {
            debug!(kind = ?session.kind(), pointer = pointer_id, "Pointer session cancelled");
            self.restore(session);
        }
    }

    fn take_session(&mut self, pointer_id: PointerId) -> Option<Session> {
        if self.session.as_ref()?.pointer_id() != pointer_id {
            return None;
        }
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::store::MemoryStore;

    const VIEWPORT: Viewport = Viewport { width: 1000.0, height: 800.0 };

    fn fab_rect() -> Rect {
        // 46x46 button sitting 14px from the right/bottom edges
        Rect::new(940.0, 740.0, 46.0, 46.0)
    }

    fn overlay() -> Overlay<MemoryStore> {
        Overlay::attach(OverlayConfig::default(), MemoryStore::new())
    }

    fn defaults() -> OverlayConfig {
        OverlayConfig::default()
    }

    #[test]
    fn test_attach_with_empty_store() {
        let overlay = overlay();
        assert_eq!(overlay.view(), &OverlayView::default());
        assert_eq!(overlay.css(), "");
        assert!(overlay.session().is_none());
    }

    #[test]
    fn test_attach_restores_saved_records() {
        let config = defaults();
        let mut store = MemoryStore::new();
        store.save(config.keys().css, "body { margin: 0; }").unwrap();
        store.save(config.keys().open, "1").unwrap();
        store.save(config.keys().position, r#"{"right":"40px","bottom":"50px"}"#).unwrap();
        store.save(config.keys().size, "garbage").unwrap();

        let overlay = Overlay::attach(config, store);
        let view = overlay.view();
        assert!(view.open);
        assert_eq!(view.editor_text, "body { margin: 0; }");
        assert_eq!(view.override_css, "body { margin: 0; }");
        assert_eq!(view.position, Some(Position::from_px(40.0, 50.0)));
        assert_eq!(view.size, None);
    }

    #[test]
    fn test_start_open_only_without_saved_flag() {
        let config = OverlayConfig { start_open: true, ..OverlayConfig::default() };
        assert!(Overlay::attach(config.clone(), MemoryStore::new()).is_open());

        let mut store = MemoryStore::new();
        store.save(config.keys().open, "0").unwrap();
        assert!(!Overlay::attach(config, store).is_open());
    }

    #[test]
    fn test_open_close_toggle_persist() {
        let mut overlay = overlay();
        let open_key = defaults().storage_open_key;

        overlay.toggle();
        assert!(overlay.is_open());
        assert_eq!(overlay.store().load(&open_key).as_deref(), Some("1"));

        overlay.close();
        assert!(!overlay.is_open());
        assert_eq!(overlay.store().load(&open_key).as_deref(), Some("0"));

        overlay.open();
        overlay.toggle();
        assert!(!overlay.is_open());
    }

    #[test]
    fn test_three_finger_gesture_only_opens() {
        let mut overlay = overlay();
        overlay.touch_start(2);
        assert!(!overlay.is_open());
        overlay.touch_start(3);
        assert!(overlay.is_open());
        overlay.touch_start(3);
        assert!(overlay.is_open());
    }

    #[test]
    fn test_three_finger_gesture_can_be_disabled() {
        let config = OverlayConfig { three_finger_open: false, ..OverlayConfig::default() };
        let mut overlay = Overlay::attach(config, MemoryStore::new());
        overlay.touch_start(3);
        assert!(!overlay.is_open());
    }

    #[test]
    fn test_set_css_roundtrip_and_persist() {
        let mut overlay = overlay();
        overlay.set_css(".a { color: red; }");
        assert_eq!(overlay.css(), ".a { color: red; }");
        assert_eq!(overlay.view().override_css, ".a { color: red; }");
        assert_eq!(
            overlay.store().load(&defaults().storage_key).as_deref(),
            Some(".a { color: red; }")
        );

        overlay.editor_input("p{}");
        assert_eq!(overlay.css(), "p{}");
        assert_eq!(overlay.view().override_css, "p{}");
    }

    #[test]
    fn test_reset_css_is_idempotent_and_keeps_layout() {
        let mut overlay = overlay();
        overlay.set_css("a{}");
        overlay.open();

        overlay.reset_css();
        let once = (overlay.view().clone(), overlay.store().load(&defaults().storage_key));
        overlay.reset_css();
        let twice = (overlay.view().clone(), overlay.store().load(&defaults().storage_key));

        assert_eq!(once, twice);
        assert_eq!(overlay.css(), "");
        assert_eq!(overlay.view().override_css, "");
        assert!(overlay.is_open());
        assert_eq!(overlay.store().load(&defaults().storage_open_key).as_deref(), Some("1"));
    }

    #[test]
    fn test_reset_ui_restores_defaults_and_keeps_css() {
        let mut overlay = overlay();
        overlay.set_css("a{}");
        overlay.open();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(1, Point::new(700.0, 500.0), VIEWPORT);
        overlay.pointer_up(1);
        overlay.begin_resize(2, Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 420.0, 420.0));
        overlay.pointer_move(2, Point::new(-50.0, -50.0), VIEWPORT);
        overlay.pointer_up(2);

        overlay.reset_ui();
        let view = overlay.view().clone();
        assert_eq!(view.position, Some(Position::from_px(14.0, 14.0)));
        assert_eq!(view.size, None);
        assert!(!view.open);
        assert_eq!(overlay.css(), "a{}");

        let config = defaults();
        assert_eq!(overlay.store().load(config.keys().position), None);
        assert_eq!(overlay.store().load(config.keys().size), None);
        assert_eq!(overlay.store().load(config.keys().open), None);
        assert_eq!(overlay.store().load(config.keys().css).as_deref(), Some("a{}"));

        overlay.reset_ui();
        assert_eq!(overlay.view(), &view);
    }

    #[test]
    fn test_reset_ui_ends_active_session() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(1, Point::new(500.0, 500.0), VIEWPORT);

        overlay.reset_ui();
        assert!(overlay.session().is_none());
        assert!(!overlay.view().dragging);

        overlay.pointer_move(1, Point::new(400.0, 400.0), VIEWPORT);
        overlay.pointer_up(1);
        assert_eq!(overlay.view().position, Some(Position::from_px(14.0, 14.0)));
        assert_eq!(overlay.store().load(&defaults().storage_pos_key), None);
    }

    #[test]
    fn test_drag_updates_live_and_commits_once() {
        let mut overlay = overlay();
        let pos_key = defaults().storage_pos_key;

        overlay.begin_reposition(7, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        assert!(overlay.view().dragging);
        assert_eq!(overlay.session().map(Session::kind), Some(SessionKind::Reposition));

        overlay.pointer_move(7, Point::new(900.0, 700.0), VIEWPORT);
        assert_eq!(overlay.view().position, Some(Position::from_px(64.0, 64.0)));
        assert_eq!(overlay.store().load(&pos_key), None);

        overlay.pointer_move(7, Point::new(850.0, 720.0), VIEWPORT);
        overlay.pointer_up(7);

        assert!(!overlay.view().dragging);
        assert!(overlay.session().is_none());
        assert_eq!(
            overlay.store().load(&pos_key).as_deref(),
            Some(r#"{"right":"114px","bottom":"44px"}"#)
        );
    }

    #[test]
    fn test_drag_clamps_to_viewport_band() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(1, Point::new(-4000.0, -4000.0), VIEWPORT);
        assert_eq!(overlay.view().position, Some(Position::from_px(944.0, 744.0)));
        overlay.pointer_move(1, Point::new(4000.0, 4000.0), VIEWPORT);
        assert_eq!(overlay.view().position, Some(Position::from_px(6.0, 6.0)));
    }

    #[test]
    fn test_pointer_up_without_move_commits_default_position() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_up(1);
        assert_eq!(
            overlay.store().load(&defaults().storage_pos_key).as_deref(),
            Some(r#"{"right":"14px","bottom":"14px"}"#)
        );
    }

    #[test]
    fn test_resize_updates_live_and_commits() {
        let mut overlay = overlay();
        let size_key = defaults().storage_size_key;
        let panel = Rect::new(566.0, 264.0, 420.0, 420.0);

        overlay.begin_resize(3, Point::new(980.0, 680.0), panel);
        assert!(!overlay.view().dragging);
        overlay.pointer_move(3, Point::new(1010.0, 660.0), VIEWPORT);
        assert_eq!(overlay.view().size, Some(PanelSize::from_px(450.0, 400.0)));
        overlay.pointer_move(3, Point::new(0.0, 0.0), VIEWPORT);
        assert_eq!(overlay.view().size, Some(PanelSize::from_px(240.0, 180.0)));
        overlay.pointer_up(3);

        assert_eq!(
            overlay.store().load(&size_key).as_deref(),
            Some(r#"{"w":"240px","h":"180px"}"#)
        );
    }

    #[test]
    fn test_resize_without_move_commits_fallback_size() {
        let mut overlay = overlay();
        overlay.begin_resize(3, Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 300.0, 300.0));
        overlay.pointer_up(3);
        assert_eq!(
            overlay.store().load(&defaults().storage_size_key).as_deref(),
            Some(r#"{"w":"420px","h":"420px"}"#)
        );
    }

    #[test]
    fn test_events_without_session_are_ignored() {
        let mut overlay = overlay();
        overlay.pointer_move(1, Point::new(10.0, 10.0), VIEWPORT);
        overlay.pointer_up(1);
        overlay.pointer_cancel(1);
        assert_eq!(overlay.view(), &OverlayView::default());
        assert!(overlay.store().is_empty());
    }

    #[test]
    fn test_events_from_other_pointer_are_ignored() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(2, Point::new(0.0, 0.0), VIEWPORT);
        overlay.pointer_up(2);
        assert_eq!(overlay.view().position, None);
        assert!(overlay.session().is_some());
    }

    #[test]
    fn test_cancel_restores_previous_layout_without_commit() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(1, Point::new(500.0, 500.0), VIEWPORT);
        overlay.pointer_cancel(1);

        assert_eq!(overlay.view().position, None);
        assert!(!overlay.view().dragging);
        assert!(overlay.session().is_none());
        assert_eq!(overlay.store().load(&defaults().storage_pos_key), None);
    }

    #[test]
    fn test_new_session_supersedes_stuck_one() {
        let mut overlay = overlay();
        overlay.begin_reposition(1, Point::new(950.0, 750.0), fab_rect(), VIEWPORT);
        overlay.pointer_move(1, Point::new(500.0, 500.0), VIEWPORT);
        // Pointer 1 never sends pointer-up
        overlay.begin_resize(2, Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 420.0, 420.0));

        assert_eq!(overlay.view().position, None);
        assert!(!overlay.view().dragging);
        assert_eq!(overlay.session().map(Session::kind), Some(SessionKind::Resize));

        overlay.pointer_up(1);
        assert!(overlay.session().is_some());
        overlay.pointer_up(2);
        assert!(overlay.session().is_none());
        assert_eq!(overlay.store().load(&defaults().storage_pos_key), None);
    }

    #[test]
    fn test_copy_css_uses_editor_text() {
        let mut overlay = overlay();
        overlay.set_css("h1 { font-size: 2rem; }");
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(overlay.copy_css(&mut clipboard), CopyOutcome::Clipboard);
        assert_eq!(clipboard.contents.as_deref(), Some("h1 { font-size: 2rem; }"));
    }
}
