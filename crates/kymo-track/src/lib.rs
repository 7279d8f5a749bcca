//! Kymograph trajectory extraction.
//!
//! Strategy per scan line:
//! - zero-phase low-pass the intensity profile,
//! - collect local maxima above a height threshold inside a row window,
//! - resolve to one row or none: a single candidate is taken as is, several
//!   resolve to the brightest, located by exact value in the full profile.
//!
//! Lines are independent and the trajectory keeps scan order; a line with no
//! qualifying peak is recorded as absent, not interpolated. [`ScanGeometry`]
//! then maps trajectory rows to signed distances and folded radii.

mod axes;
mod extractor;

pub use axes::ScanGeometry;
pub use extractor::{TrackConfig, TrackError, Trajectory, TrajectoryExtractor};
