//! Triple-top breakout detection on a close series.

/// Minimum observations before a breakout can be reported.
pub const MIN_OBSERVATIONS: usize = 5;

/// Indices of local peaks: closes strictly above both immediate neighbours.
///
/// The first and last bars have only one neighbour and are never peaks.
pub fn local_peaks(closes: &[f64]) -> Vec<usize> {
    if closes.len() < 3 {
        return Vec::new();
    }
    (1..closes.len() - 1)
        .filter(|&i| closes[i] > closes[i - 1] && closes[i] > closes[i + 1])
        .collect()
}

/// True iff the latest close exceeds the highest of the last three local peaks.
///
/// Fewer than five observations or fewer than three peaks → false.
pub fn three_peak_breakout(closes: &[f64]) -> bool {
    if closes.len() < MIN_OBSERVATIONS {
        return false;
    }
    let peaks = local_peaks(closes);
    if peaks.len() < 3 {
        return false;
    }
    let max_peak = peaks[peaks.len() - 3..]
        .iter()
        .map(|&i| closes[i])
        .fold(f64::NEG_INFINITY, f64::max);
    let current = closes[closes.len() - 1];
    current > max_peak
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_short_is_false() {
        assert!(!three_peak_breakout(&[1.0, 3.0, 1.0, 9.0]));
    }

    #[test]
    fn monotonic_series_has_no_peaks() {
        let closes: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert!(local_peaks(&closes).is_empty());
        assert!(!three_peak_breakout(&closes));
    }

    #[test]
    fn breakout_above_triple_top() {
        // peaks at 1, 3, 5 with values 5, 6, 5; last close 7 clears all
        let closes = [1.0, 5.0, 2.0, 6.0, 3.0, 5.0, 4.0, 7.0];
        assert_eq!(local_peaks(&closes), vec![1, 3, 5]);
        assert!(three_peak_breakout(&closes));
    }

    #[test]
    fn no_breakout_below_highest_peak() {
        let closes = [1.0, 5.0, 2.0, 6.0, 3.0, 5.0, 4.0, 5.5];
        assert!(!three_peak_breakout(&closes));
    }

    #[test]
    fn only_last_three_peaks_count() {
        // an old high peak (20) is outside the last three
        let closes = [1.0, 20.0, 2.0, 5.0, 3.0, 6.0, 4.0, 5.0, 4.5, 7.0];
        assert_eq!(local_peaks(&closes).len(), 4);
        assert!(three_peak_breakout(&closes));
    }

    #[test]
    fn equal_neighbours_are_not_peaks() {
        assert!(local_peaks(&[1.0, 2.0, 2.0, 1.0]).is_empty());
    }
}
