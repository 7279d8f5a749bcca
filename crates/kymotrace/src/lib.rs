//! Umbrella crate for the `kymotrace` workspace.
//!
//! Re-exports the container, filtering and tracking crates so applications
//! can depend on one crate for the whole pipeline.

pub use kymo_core::*;
pub use kymo_filter::*;
pub use kymo_track::*;
