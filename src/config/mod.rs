//! Configuration for the overlay and for rule extraction
//!
//! - **overlay**: `OverlayConfig`, the single initialization object (serde, camelCase keys)
//! - **filter**: `FilterConfig`, which stylesheets an extraction may read

pub mod filter;
pub mod overlay;

pub use filter::FilterConfig;
pub use overlay::{OverlayConfig, StorageKeys};
