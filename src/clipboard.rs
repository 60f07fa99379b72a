//! Best-effort clipboard writes
//!
//! Hosts provide the primary clipboard API and, optionally, the legacy
//! "select the text and copy" path. Failures never reach the caller.

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Fallback used when `write_text` fails
    fn copy_via_selection(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no selection copy path".to_string()))
    }
}

/// How a best-effort copy ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    Selection,
    Failed,
}

/// Try the clipboard, then the selection path; report which one worked
pub fn copy_best_effort(clipboard: &mut dyn Clipboard, text: &str) -> CopyOutcome {
    match clipboard.write_text(text) {
        Ok(()) => CopyOutcome::Clipboard,
        Err(e) => {
            debug!(error = %e, "Clipboard write failed, trying selection copy");
            match clipboard.copy_via_selection(text) {
                Ok(()) => CopyOutcome::Selection,
                Err(e) => {
                    warn!(error = %e, "Copy failed");
                    CopyOutcome::Failed
                }
            }
        }
    }
}

/// Clipboard kept in memory; handy for hosts without a system clipboard
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
