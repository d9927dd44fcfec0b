//! Consecutive growth streaks.

/// Count consecutive quarters, starting from the newest, in which each
/// quarter strictly exceeds the one before it.
///
/// The walk stops at the first tie, decline or missing value, so the result
/// lies in `0..=len - 1` (zero for empty or single-point series).
pub fn growth_streak(series: &[Option<f64>]) -> usize {
    series
        .windows(2)
        .take_while(|pair| matches!(pair, [Some(newer), Some(older)] if newer > older))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn series(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    #[rstest]
    #[case(&[4.0, 3.0, 2.0, 1.0], 3)]
    #[case(&[4.0, 4.0, 2.0], 0)]
    #[case(&[5.0, 4.0, 4.0, 1.0], 1)]
    #[case(&[1.0, 2.0, 3.0], 0)]
    #[case(&[-1.0, -2.0, -3.0], 2)]
    #[case(&[7.0], 0)]
    #[case(&[], 0)]
    fn test_streak(#[case] values: &[f64], #[case] expected: usize) {
        assert_eq!(growth_streak(&series(values)), expected);
    }

    #[test]
    fn test_missing_value_stops_streak() {
        assert_eq!(growth_streak(&[Some(3.0), Some(2.0), None, Some(0.5)]), 1);
        assert_eq!(growth_streak(&[None, Some(2.0), Some(1.0)]), 0);
    }

    #[test]
    fn test_nan_stops_streak() {
        assert_eq!(growth_streak(&[Some(3.0), Some(f64::NAN), Some(1.0)]), 0);
    }

    #[test]
    fn test_streak_is_bounded_by_length() {
        let values: Vec<Option<f64>> = (0..9).rev().map(|v| Some(f64::from(v))).collect();
        assert_eq!(growth_streak(&values), values.len() - 1);
    }
}
