use core::f64::consts::PI;
use core::fmt;

/// Second-order section with the denominator normalized to `a0 == 1`.
///
/// The raw bilinear/cookbook formulas produce `a0 != 1`; dividing through at
/// construction keeps the run-time difference equation in its standard form.
/// A first-order factor is held as a section with `b2 == a2 == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Sos {
    /// Gain at zero frequency. Exactly 1 for the low-pass sections built
    /// here, up to rounding.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DesignError {
    ZeroOrder,
    CutoffNotPositive { cutoff: f64 },
    CutoffAboveNyquist { cutoff: f64, nyquist: f64 },
    SignalTooShort { len: usize, min_len: usize },
}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroOrder => write!(f, "filter order must be at least 1"),
            Self::CutoffNotPositive { cutoff } => {
                write!(f, "cutoff frequency must be positive, got {cutoff}")
            }
            Self::CutoffAboveNyquist { cutoff, nyquist } => {
                write!(
                    f,
                    "cutoff frequency {cutoff} must stay strictly below the Nyquist rate {nyquist}"
                )
            }
            Self::SignalTooShort { len, min_len } => {
                write!(f, "signal of {len} samples is too short to filter (minimum {min_len})")
            }
        }
    }
}

impl std::error::Error for DesignError {}

/// Designs a digital Butterworth low-pass of the given order as cascaded
/// second-order sections.
///
/// The analog prototype spaces its poles `pi/order` apart: conjugate pair
/// `k` sits at angle `pi*(2k + 1 + order mod 2)/(2*order)` from the negative
/// real axis, so its quality factor is `1/(2*cos(angle))`. Each pair maps to
/// one biquad via the bilinear transform with the cutoff prewarped, placing
/// the -3 dB point of the cascade exactly on `cutoff`. Odd orders put the
/// remaining pole on the axis itself, held as a first-order section.
pub fn butter_lowpass(
    order: usize,
    cutoff: f64,
    sampling_rate: f64,
) -> Result<Vec<Sos>, DesignError> {
    if order == 0 {
        return Err(DesignError::ZeroOrder);
    }
    if !(cutoff > 0.0) {
        return Err(DesignError::CutoffNotPositive { cutoff });
    }

    let nyquist = sampling_rate / 2.0;
    if !(cutoff < nyquist) {
        return Err(DesignError::CutoffAboveNyquist { cutoff, nyquist });
    }

    let w0 = PI * cutoff / nyquist;
    let (cos_w0, sin_w0) = (w0.cos(), w0.sin());

    let mut sections = Vec::with_capacity(order.div_ceil(2));
    for k in 0..order / 2 {
        let angle = PI * (2 * k + 1 + order % 2) as f64 / (2 * order) as f64;
        let q = 1.0 / (2.0 * angle.cos());
        sections.push(pair_section(cos_w0, sin_w0, q));
    }
    if !order.is_multiple_of(2) {
        sections.push(real_pole_section(w0));
    }

    Ok(sections)
}

/// RBJ cookbook low-pass biquad for one conjugate pole pair.
fn pair_section(cos_w0: f64, sin_w0: f64, q: f64) -> Sos {
    let alpha = sin_w0 / (2.0 * q);
    let a0 = 1.0 + alpha;

    Sos {
        b0: (1.0 - cos_w0) * 0.5 / a0,
        b1: (1.0 - cos_w0) / a0,
        b2: (1.0 - cos_w0) * 0.5 / a0,
        a1: -2.0 * cos_w0 / a0,
        a2: (1.0 - alpha) / a0,
    }
}

/// Bilinear transform of the real-pole factor `1/(s + 1)`.
fn real_pole_section(w0: f64) -> Sos {
    let k = (w0 * 0.5).tan();
    let a0 = k + 1.0;

    Sos {
        b0: k / a0,
        b1: k / a0,
        b2: 0.0,
        a1: (k - 1.0) / a0,
        a2: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{DesignError, Sos, butter_lowpass};

    /// Cascade magnitude response at normalized frequency `w` (rad/sample).
    fn magnitude(sections: &[Sos], w: f64) -> f64 {
        let mut mag = 1.0;
        for s in sections {
            let num_re = s.b0 + s.b1 * w.cos() + s.b2 * (2.0 * w).cos();
            let num_im = -(s.b1 * w.sin() + s.b2 * (2.0 * w).sin());
            let den_re = 1.0 + s.a1 * w.cos() + s.a2 * (2.0 * w).cos();
            let den_im = -(s.a1 * w.sin() + s.a2 * (2.0 * w).sin());
            mag *= num_re.hypot(num_im) / den_re.hypot(den_im);
        }
        mag
    }

    #[test]
    fn section_counts() {
        assert_eq!(butter_lowpass(4, 0.1, 1.0).expect("valid").len(), 2);
        let odd = butter_lowpass(5, 0.1, 1.0).expect("valid");
        assert_eq!(odd.len(), 3);
        assert_eq!(odd[2].b2, 0.0);
        assert_eq!(odd[2].a2, 0.0);
    }

    #[test]
    fn sections_have_unit_dc_gain() {
        for order in 1..=6 {
            let sections = butter_lowpass(order, 0.08, 1.0).expect("valid design");
            for s in &sections {
                assert!((s.dc_gain() - 1.0).abs() < 1e-12, "order {order}: {s:?}");
            }
        }
    }

    #[test]
    fn order_two_matches_reference_coefficients() {
        // Half-Nyquist cutoff, order 2: textbook values.
        let s = butter_lowpass(2, 0.25, 1.0).expect("valid design")[0];

        assert!((s.b0 - 0.292_893_218_8).abs() < 1e-9);
        assert!((s.b1 - 0.585_786_437_6).abs() < 1e-9);
        assert!((s.b2 - 0.292_893_218_8).abs() < 1e-9);
        assert!(s.a1.abs() < 1e-12);
        assert!((s.a2 - 0.171_572_875_3).abs() < 1e-9);
    }

    #[test]
    fn cascade_is_3db_down_at_cutoff() {
        for order in [1usize, 2, 3, 4, 5, 7] {
            let cutoff = 0.1;
            let sections = butter_lowpass(order, cutoff, 1.0).expect("valid design");
            let w0 = core::f64::consts::PI * cutoff / 0.5;
            let mag = magnitude(&sections, w0);
            assert!(
                (mag - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9,
                "order {order}: |H| = {mag}"
            );
        }
    }

    #[test]
    fn cascade_matches_the_butterworth_magnitude() {
        // The bilinear transform maps the digital frequency `w` onto the
        // analog prototype at `tan(w/2)/tan(w0/2)`, so the cascade must
        // reproduce `1/sqrt(1 + (tan(w/2)/tan(w0/2))^(2*order))` everywhere,
        // odd orders included.
        let cutoff = 0.1;
        let w0 = core::f64::consts::PI * cutoff / 0.5;
        let tan_w0 = (w0 / 2.0).tan();

        for order in 1usize..=7 {
            let sections = butter_lowpass(order, cutoff, 1.0).expect("valid design");
            for frac in [0.05, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9] {
                let w = core::f64::consts::PI * frac;
                let ratio = (w / 2.0).tan() / tan_w0;
                let want = 1.0 / (1.0 + ratio.powi(2 * order as i32)).sqrt();
                let got = magnitude(&sections, w);
                assert!(
                    (got - want).abs() < 1e-9,
                    "order {order}, w = {w}: |H| = {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn magnitude_rolls_off_monotonically() {
        let sections = butter_lowpass(4, 0.1, 1.0).expect("valid design");
        let mut prev = magnitude(&sections, 1e-3);
        for i in 1..50 {
            let w = core::f64::consts::PI * i as f64 / 50.0;
            let mag = magnitude(&sections, w);
            assert!(mag < prev + 1e-12, "w = {w}: {mag} vs {prev}");
            prev = mag;
        }
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert_eq!(butter_lowpass(0, 0.1, 1.0), Err(DesignError::ZeroOrder));
        assert_eq!(
            butter_lowpass(4, 0.0, 1.0),
            Err(DesignError::CutoffNotPositive { cutoff: 0.0 })
        );
        assert_eq!(
            butter_lowpass(4, 0.5, 1.0),
            Err(DesignError::CutoffAboveNyquist {
                cutoff: 0.5,
                nyquist: 0.5
            })
        );
        assert!(butter_lowpass(4, 0.6, 1.0).is_err());
    }
}
