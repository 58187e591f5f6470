// Per-category normalization of the male/female weight pair.

/// Round half-up (ties away from zero) to `places` decimal places.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Rescale a [male, female] pair to sum to 1, rounding each side to two
/// decimals. A zero-sum pair divides by zero and comes back as NaN on both
/// sides; the builder flags those rows instead of inventing a split.
pub fn normalize_pair(pair: [f64; 2]) -> [f64; 2] {
    let denominator = pair[0] + pair[1];
    [
        round_half_up(pair[0] / denominator, 2),
        round_half_up(pair[1] / denominator, 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up_ties_away_from_zero() {
        assert_eq!(round_half_up(0.125, 2), 0.13);
        assert_eq!(round_half_up(-0.125, 2), -0.13);
        assert_eq!(round_half_up(0.124, 2), 0.12);
        assert_eq!(round_half_up(2.0, 2), 2.0);
    }

    #[test]
    fn test_normalize_pair_sums_to_one() {
        let norm = normalize_pair([0.09370, 0.12494]);
        assert_eq!(norm, [0.43, 0.57]);
        assert!((norm[0] + norm[1] - 1.0).abs() <= 0.01);
    }

    #[test]
    fn test_normalize_equal_pair_splits_evenly() {
        assert_eq!(normalize_pair([0.2, 0.2]), [0.5, 0.5]);
    }

    #[test]
    fn test_normalize_zero_pair_is_nan_not_panic() {
        let norm = normalize_pair([0.0, 0.0]);
        assert!(norm[0].is_nan());
        assert!(norm[1].is_nan());
    }
}
