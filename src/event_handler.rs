use tracing::{debug, trace};

use crate::clipboard::{Clipboard, CopyOutcome};
use crate::overlay::{Overlay, PointerId};
use crate::store::ConfigStore;
use crate::types::{Point, Rect, Viewport};

/// Part of the overlay a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Title bar background
    TitleBar,
    /// A button inside the title bar (Copy, Reset, Close)
    TitleBarButton,
    ResizeHandle,
    Other,
}

/// Title bar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Copy,
    ResetCss,
    ResetUi,
    Close,
}

/// Everything the host shell forwards to the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    PointerDown {
        pointer_id: PointerId,
        target: PointerTarget,
        point: Point,
    },
    PointerMove {
        pointer_id: PointerId,
        point: Point,
    },
    PointerUp {
        pointer_id: PointerId,
    },
    PointerCancel {
        pointer_id: PointerId,
    },
    TouchStart {
        touches: usize,
    },
    FabClick,
    EditorInput(String),
    Action(Action),
}

/// Live geometry, read from the host when it is needed
pub trait HostGeometry {
    fn viewport(&self) -> Viewport;
    /// Bounding box of the whole overlay (button plus panel)
    fn overlay_rect(&self) -> Rect;
    fn panel_rect(&self) -> Rect;
}

/// Route one host event to the overlay. Returns the copy outcome for
/// [`Action::Copy`], `None` for everything else.
pub fn handle_event<S: ConfigStore>(
    overlay: &mut Overlay<S>,
    event: OverlayEvent,
    geometry: &impl HostGeometry,
    clipboard: &mut dyn Clipboard,
) -> Option<CopyOutcome> {
    match event {
        OverlayEvent::PointerDown { pointer_id, target, point } => match target {
            PointerTarget::TitleBar => {
                overlay.begin_reposition(pointer_id, point, geometry.overlay_rect(), geometry.viewport());
            }
            PointerTarget::ResizeHandle => {
                overlay.begin_resize(pointer_id, point, geometry.panel_rect());
            }
            PointerTarget::TitleBarButton | PointerTarget::Other => {
                trace!(?target, "Pointer-down ignored");
            }
        },
        OverlayEvent::PointerMove { pointer_id, point } => {
            overlay.pointer_move(pointer_id, point, geometry.viewport());
        }
        OverlayEvent::PointerUp { pointer_id } => overlay.pointer_up(pointer_id),
        OverlayEvent::PointerCancel { pointer_id } => overlay.pointer_cancel(pointer_id),
        OverlayEvent::TouchStart { touches } => overlay.touch_start(touches),
        OverlayEvent::FabClick => overlay.toggle(),
        OverlayEvent::EditorInput(text) => overlay.editor_input(&text),
        OverlayEvent::Action(action) => {
            debug!(?action, "Overlay action");
            match action {
                Action::Copy => return Some(overlay.copy_css(clipboard)),
                Action::ResetCss => overlay.reset_css(),
                Action::ResetUi => overlay.reset_ui(),
                Action::Close => overlay.close(),
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::OverlayConfig;
    use crate::store::MemoryStore;
    use crate::types::{PanelSize, Position};

    struct Fixed;

    impl HostGeometry for Fixed {
        fn viewport(&self) -> Viewport {
            Viewport::new(1000.0, 800.0)
        }
        fn overlay_rect(&self) -> Rect {
            Rect::new(940.0, 740.0, 46.0, 46.0)
        }
        fn panel_rect(&self) -> Rect {
            Rect::new(566.0, 264.0, 420.0, 420.0)
        }
    }

    fn dispatch(overlay: &mut Overlay<MemoryStore>, event: OverlayEvent) -> Option<CopyOutcome> {
        handle_event(overlay, event, &Fixed, &mut MemoryClipboard::default())
    }

    fn overlay() -> Overlay<MemoryStore> {
        Overlay::attach(OverlayConfig::default(), MemoryStore::new())
    }

    #[test]
    fn test_title_bar_drag() {
        let mut overlay = overlay();
        let down = OverlayEvent::PointerDown {
            pointer_id: 1,
            target: PointerTarget::TitleBar,
            point: Point::new(950.0, 750.0),
        };
        dispatch(&mut overlay, down);
        assert!(overlay.view().dragging);

        dispatch(&mut overlay, OverlayEvent::PointerMove { pointer_id: 1, point: Point::new(940.0, 730.0) });
        dispatch(&mut overlay, OverlayEvent::PointerUp { pointer_id: 1 });
        assert_eq!(overlay.view().position, Some(Position::from_px(24.0, 34.0)));
        assert!(!overlay.view().dragging);
    }

    #[test]
    fn test_button_in_title_bar_does_not_drag() {
        let mut overlay = overlay();
        let down = OverlayEvent::PointerDown {
            pointer_id: 1,
            target: PointerTarget::TitleBarButton,
            point: Point::new(950.0, 750.0),
        };
        dispatch(&mut overlay, down);
        assert!(overlay.session().is_none());
    }

    #[test]
    fn test_resize_handle() {
        let mut overlay = overlay();
        let down = OverlayEvent::PointerDown {
            pointer_id: 4,
            target: PointerTarget::ResizeHandle,
            point: Point::new(980.0, 680.0),
        };
        dispatch(&mut overlay, down);
        dispatch(&mut overlay, OverlayEvent::PointerMove { pointer_id: 4, point: Point::new(1000.0, 700.0) });
        dispatch(&mut overlay, OverlayEvent::PointerCancel { pointer_id: 4 });
        assert_eq!(overlay.view().size, None);

        let down = OverlayEvent::PointerDown {
            pointer_id: 5,
            target: PointerTarget::ResizeHandle,
            point: Point::new(980.0, 680.0),
        };
        dispatch(&mut overlay, down);
        dispatch(&mut overlay, OverlayEvent::PointerMove { pointer_id: 5, point: Point::new(1000.0, 700.0) });
        dispatch(&mut overlay, OverlayEvent::PointerUp { pointer_id: 5 });
        assert_eq!(overlay.view().size, Some(PanelSize::from_px(440.0, 440.0)));
    }

    #[test]
    fn test_buttons_and_editor() {
        let mut overlay = overlay();
        dispatch(&mut overlay, OverlayEvent::FabClick);
        assert!(overlay.is_open());

        dispatch(&mut overlay, OverlayEvent::EditorInput("a { color: red; }".to_string()));
        let mut clipboard = MemoryClipboard::default();
        let outcome = handle_event(&mut overlay, OverlayEvent::Action(Action::Copy), &Fixed, &mut clipboard);
        assert_eq!(outcome, Some(CopyOutcome::Clipboard));
        assert_eq!(clipboard.contents.as_deref(), Some("a { color: red; }"));

        assert_eq!(dispatch(&mut overlay, OverlayEvent::Action(Action::ResetCss)), None);
        assert_eq!(overlay.css(), "");

        dispatch(&mut overlay, OverlayEvent::Action(Action::Close));
        assert!(!overlay.is_open());

        dispatch(&mut overlay, OverlayEvent::TouchStart { touches: 3 });
        assert!(overlay.is_open());
        dispatch(&mut overlay, OverlayEvent::Action(Action::ResetUi));
        assert!(!overlay.is_open());
    }
}
