//! Live CSS overlay and matched-rule extraction
//!
//! Two independent pieces share this crate:
//!
//! - [`extract`] walks a document's readable stylesheets and serializes the
//!   style rules whose selectors match a target element.
//! - [`overlay`] is the floating editor: open state, live override CSS and
//!   drag/resize sessions, persisted through a [`store::ConfigStore`].
//!
//! The host (a browser binding, or the in-memory [`dom`]) is reached through
//! the traits in [`cssom`], [`clipboard`] and [`event_handler`].

#![forbid(unsafe_code)]

pub mod clipboard;
pub mod config;
pub mod constants;
pub mod cssom;
pub mod dom;
pub mod event_handler;
pub mod extract;
pub mod gate;
pub mod logging;
pub mod overlay;
pub mod persistence;
pub mod selector;
pub mod store;
pub mod types;

pub use clipboard::{Clipboard, CopyOutcome, MemoryClipboard};
pub use config::{FilterConfig, OverlayConfig};
pub use extract::{ExtractError, extract, extract_and_copy};
pub use overlay::{Boot, BootError, Overlay, OverlayView};
pub use store::{ConfigStore, FileStore, MemoryStore};
