//! Foundational primitives for kymograph trajectory analysis.
//!
//! ## Axes
//! A kymograph has `rows` spatial samples per scan line and `lines` scan
//! lines acquired in order. The row index maps linearly to physical position;
//! the line index is the trajectory axis and its order is meaningful.
//!
//! ## Storage
//! Scan lines are stored contiguously (line-major): line `i` occupies
//! `data[i * rows .. (i + 1) * rows]`. Per-line processing therefore operates
//! on plain slices. Image files arrive row-major with one scan line per
//! column; [`Kymograph::from_row_major`] performs that gather once at load.

mod error;
mod kymograph;

pub use error::Error;
pub use kymograph::Kymograph;
