//! Small numeric helpers shared by the feature builder and the scorers.

/// Rounds `value` to `decimals` places.
///
/// Rounding works on the exact decimal expansion of the float, ties to even,
/// so `26.15` (stored as 26.1499...) becomes `26.1`. Scores are reported at
/// fixed precision (`risk_score` at 1dp, probabilities at 4dp) and the
/// rounding must agree everywhere those values are compared.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let places = decimals.max(0) as usize;
    format!("{value:.places$}").parse().unwrap_or(value)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (ddof = 0).
pub fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Sample standard deviation (ddof = 1); 0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(12.25, 1), 12.2);
        assert_eq!(round_to(0.5, 0), 0.0);
    }

    #[test]
    fn test_round_uses_exact_binary_value() {
        assert_eq!(round_to(26.15, 1), 26.1);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(12.652000000000005, 1), 12.7);
    }

    #[test]
    fn test_round_regular_values() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(87.66, 1), 87.7);
        assert_eq!(round_to(-1.26, 1), -1.3);
    }

    #[test]
    fn test_population_std_matches_numpy() {
        // np.std([0.2, 0.4, 0.6, 0.8]) == 0.2236...
        let s = population_std(&[0.2, 0.4, 0.6, 0.8]);
        assert!((s - 0.223_606_797_7).abs() < 1e-9, "std was {s}");
    }

    #[test]
    fn test_std_of_single_value_is_zero() {
        assert_eq!(population_std(&[0.7]), 0.0);
        assert_eq!(sample_std(&[0.7]), 0.0);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }
}
