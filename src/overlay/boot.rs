//! One-shot overlay initialization owned by the caller

use thiserror::Error;
use tracing::info;

use super::Overlay;
use crate::config::OverlayConfig;
use crate::gate;
use crate::store::ConfigStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("live CSS overlay is already initialized")]
    AlreadyInitialized,
}

#[derive(Debug)]
enum BootState<S: ConfigStore> {
    Fresh,
    /// Gate said no; nothing was attached
    Disabled,
    Attached(Box<Overlay<S>>),
}

/// Holds the result of the single allowed `init` call
#[derive(Debug)]
pub struct Boot<S: ConfigStore> {
    state: BootState<S>,
}

impl<S: ConfigStore> Default for Boot<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ConfigStore> Boot<S> {
    pub fn new() -> Self {
        Self { state: BootState::Fresh }
    }

    /// Attach the overlay if the page passes the enablement gate.
    ///
    /// Returns `Ok(None)` when the gate disables the overlay; any later call
    /// fails with [`BootError::AlreadyInitialized`] either way.
    pub fn init(
        &mut self,
        mut config: OverlayConfig,
        page_url: &str,
        store: S,
    ) -> Result<Option<&mut Overlay<S>>, BootError> {
        if !matches!(self.state, BootState::Fresh) {
            return Err(BootError::AlreadyInitialized);
        }

        config.validate_and_clamp();
        if !gate::should_enable_for(&config, page_url) {
            info!(url = %page_url, "Live CSS overlay disabled for this page");
            self.state = BootState::Disabled;
            return Ok(None);
        }

        self.state = BootState::Attached(Box::new(Overlay::attach(config, store)));
        Ok(self.overlay())
    }

    pub fn overlay(&mut self) -> Option<&mut Overlay<S>> {
        match &mut self.state {
            BootState::Attached(overlay) => Some(overlay.as_mut()),
            _ => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self.state, BootState::Fresh)
    }
}
