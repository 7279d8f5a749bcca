/// Indices of local maxima with height at or above `min_height`.
///
/// A sample qualifies when it is strictly greater than both neighbors. A
/// flat-topped run of equal samples that rises on the left and falls on the
/// right counts once and reports the midpoint of the run (left-biased for
/// even runs). The first and last samples never qualify.
pub fn local_maxima(signal: &[f32], min_height: f32) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let i_last = signal.len() - 1;
    let mut i = 1;
    while i < i_last {
        if signal[i - 1] < signal[i] {
            // Walk past a possible flat top; the run must descend on the
            // right to count.
            let mut i_ahead = i + 1;
            while i_ahead < i_last && signal[i_ahead] == signal[i] {
                i_ahead += 1;
            }

            if signal[i_ahead] < signal[i] {
                let mid = (i + i_ahead - 1) / 2;
                if signal[mid] >= min_height {
                    peaks.push(mid);
                }
                i = i_ahead;
            }
        }
        i += 1;
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::local_maxima;

    #[test]
    fn finds_strict_maxima_in_order() {
        let signal = [0.0f32, 1.0, 0.0, 0.5, 2.0, 0.5, 0.0];
        assert_eq!(local_maxima(&signal, 0.0), vec![1, 4]);
    }

    #[test]
    fn height_threshold_filters_candidates() {
        let signal = [0.0f32, 1.0, 0.0, 0.5, 2.0, 0.5, 0.0];
        assert_eq!(local_maxima(&signal, 1.5), vec![4]);
        assert_eq!(local_maxima(&signal, 1.0), vec![1, 4]);
        assert_eq!(local_maxima(&signal, 2.5), Vec::<usize>::new());
    }

    #[test]
    fn boundary_samples_never_qualify() {
        assert_eq!(local_maxima(&[5.0f32, 1.0, 0.0], 0.0), Vec::<usize>::new());
        assert_eq!(local_maxima(&[0.0f32, 1.0, 5.0], 0.0), Vec::<usize>::new());
    }

    #[test]
    fn plateau_reports_midpoint() {
        let signal = [0.0f32, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&signal, 0.0), vec![2]);

        // Even run: left-biased midpoint.
        let signal = [0.0f32, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&signal, 0.0), vec![1]);
    }

    #[test]
    fn plateau_touching_the_end_is_not_a_peak() {
        let signal = [0.0f32, 1.0, 1.0];
        assert_eq!(local_maxima(&signal, 0.0), Vec::<usize>::new());
    }

    #[test]
    fn flat_signal_has_no_maxima() {
        assert_eq!(local_maxima(&[0.0f32; 16], 0.0), Vec::<usize>::new());
        assert_eq!(local_maxima(&[2.0f32; 16], 0.0), Vec::<usize>::new());
    }

    #[test]
    fn short_signals_have_no_maxima() {
        assert_eq!(local_maxima(&[], 0.0), Vec::<usize>::new());
        assert_eq!(local_maxima(&[1.0f32, 2.0], 0.0), Vec::<usize>::new());
    }
}
