//! 1D low-pass filtering and peak search for kymograph scan lines.
//!
//! The low-pass is a digital Butterworth realized as cascaded second-order
//! sections (biquads), which keeps higher orders numerically stable. It is
//! applied forward-backward (zero phase), so feature positions in the
//! filtered profile stay aligned with the raw profile.
//!
//! Frequencies are in the caller's units: a profile sampled every
//! `pixel_size` has `sampling_rate = 1 / pixel_size`, and the cutoff must
//! stay strictly below the Nyquist rate (half the sampling rate).
//!
//! Profiles are `f32`; coefficients and the filter state are `f64`, and the
//! result is narrowed back to `f32` once on output.

pub mod design;
pub mod peaks;
pub mod zero_phase;

pub use design::{DesignError, Sos, butter_lowpass};
pub use peaks::local_maxima;
pub use zero_phase::ZeroPhaseLowpass;
