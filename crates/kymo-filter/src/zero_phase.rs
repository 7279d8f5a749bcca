use crate::design::{DesignError, Sos, butter_lowpass};

/// Shortest profile [`ZeroPhaseLowpass::apply`] accepts. Anything shorter
/// cannot hold an interior local maximum either.
const MIN_SIGNAL_LEN: usize = 3;

/// Butterworth low-pass applied forward-backward, for zero phase shift.
///
/// The input is extended at both ends with an odd (point-mirrored)
/// reflection, each section is primed with its constant-signal steady state,
/// and the cascade runs once forward and once in reverse. The two passes
/// square the magnitude response and cancel the phase, so a constant signal
/// passes through unchanged and peak positions are not displaced.
#[derive(Debug, Clone)]
pub struct ZeroPhaseLowpass {
    sections: Vec<Sos>,
}

impl ZeroPhaseLowpass {
    pub fn new(order: usize, cutoff: f64, sampling_rate: f64) -> Result<Self, DesignError> {
        Ok(Self {
            sections: butter_lowpass(order, cutoff, sampling_rate)?,
        })
    }

    pub fn sections(&self) -> &[Sos] {
        &self.sections
    }

    /// Samples mirrored onto each end before filtering. Clamped to
    /// `len - 1` for short profiles, where the full mirror is all there is.
    pub fn pad_len(&self, len: usize) -> usize {
        (3 * (2 * self.sections.len() + 1)).min(len.saturating_sub(1))
    }

    /// Filters one profile with zero phase distortion. Output length equals
    /// input length.
    pub fn apply(&self, signal: &[f32]) -> Result<Vec<f32>, DesignError> {
        let n = signal.len();
        if n < MIN_SIGNAL_LEN {
            return Err(DesignError::SignalTooShort {
                len: n,
                min_len: MIN_SIGNAL_LEN,
            });
        }

        let pad = self.pad_len(n);
        let first = f64::from(signal[0]);
        let last = f64::from(signal[n - 1]);

        let mut ext = Vec::with_capacity(n + 2 * pad);
        for i in (1..=pad).rev() {
            ext.push(2.0 * first - f64::from(signal[i]));
        }
        ext.extend(signal.iter().map(|&v| f64::from(v)));
        for i in 1..=pad {
            ext.push(2.0 * last - f64::from(signal[n - 1 - i]));
        }

        for s in &self.sections {
            filter_in_place(s, &mut ext);
        }
        ext.reverse();
        for s in &self.sections {
            filter_in_place(s, &mut ext);
        }
        ext.reverse();

        Ok(ext[pad..pad + n].iter().map(|&v| v as f32).collect())
    }
}

/// One causal pass in direct form II transposed. The delay line starts at
/// the steady state for a constant input `x[0]`, so the section joins the
/// mirrored extension without a startup step.
fn filter_in_place(s: &Sos, x: &mut [f64]) {
    let x0 = x[0];
    let gain = s.dc_gain();
    let mut z1 = (gain - s.b0) * x0;
    let mut z2 = (s.b2 - s.a2 * gain) * x0;

    for v in x.iter_mut() {
        let xi = *v;
        let y = s.b0 * xi + z1;
        z1 = s.b1 * xi - s.a1 * y + z2;
        z2 = s.b2 * xi - s.a2 * y;
        *v = y;
    }
}
