//! Gini-based market concentration.

use retail_map_analytics_models::{Concentration, ConcentrationLevel, CountMap};

/// Gini coefficient of store counts across geographic buckets.
///
/// Computed as the sum of absolute pairwise differences over
/// `2 * n * total`. An empty map, or one whose counts are all zero, is
/// reported as zero concentration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_concentration(counts: &CountMap) -> Concentration {
    let mut values: Vec<u64> = counts.values().copied().collect();
    values.sort_unstable();

    let n = values.len();
    let total: u64 = values.iter().sum();
    if n == 0 || total == 0 {
        return Concentration::default();
    }

    // For sorted values, sum_{i,j} |x_i - x_j| = 2 * sum_i (2i - n + 1) * x_i
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &x)| (2.0 * i as f64 - n as f64 + 1.0) * x as f64)
        .sum();
    let sum_of_differences = 2.0 * weighted;

    let gini = sum_of_differences / (2.0 * n as f64 * total as f64);
    Concentration {
        gini,
        level: ConcentrationLevel::from_gini(gini),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[u64]) -> CountMap {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("state-{i}"), *v))
            .collect()
    }

    fn pairwise_gini(values: &[u64]) -> f64 {
        let n = values.len() as f64;
        let total: u64 = values.iter().sum();
        let mut diff = 0.0;
        for a in values {
            for b in values {
                diff += (*a as f64 - *b as f64).abs();
            }
        }
        diff / (2.0 * n * total as f64)
    }

    #[test]
    fn empty_and_all_zero_are_low() {
        assert_eq!(calculate_concentration(&CountMap::new()), Concentration::default());
        assert_eq!(calculate_concentration(&counts(&[0, 0])), Concentration::default());
    }

    #[test]
    fn uniform_distribution_is_zero() {
        let c = calculate_concentration(&counts(&[7, 7, 7, 7]));
        assert!(c.gini.abs() < 1e-12);
        assert_eq!(c.level, ConcentrationLevel::Low);
    }

    #[test]
    fn single_bucket_holding_everything_is_high() {
        let skewed = calculate_concentration(&counts(&[0, 0, 0, 0, 100]));
        let moderate = calculate_concentration(&counts(&[10, 20, 30, 40]));
        let uniform = calculate_concentration(&counts(&[25, 25, 25, 25]));

        assert_eq!(skewed.level, ConcentrationLevel::High);
        assert!((skewed.gini - 0.8).abs() < 1e-12);
        assert!(skewed.gini > moderate.gini);
        assert!(moderate.gini > uniform.gini);
    }

    #[test]
    fn matches_pairwise_definition_and_stays_in_range() {
        for values in [
            vec![1u64],
            vec![3, 1],
            vec![5, 9, 1, 0, 2],
            vec![120, 4, 4, 33, 7, 0, 61],
        ] {
            let c = calculate_concentration(&counts(&values));
            assert!((c.gini - pairwise_gini(&values)).abs() < 1e-12, "{values:?}");
            assert!((0.0..=1.0).contains(&c.gini));
        }
    }

    #[test]
    fn medium_band() {
        // gini = 0.5
        let c = calculate_concentration(&counts(&[0, 0, 1, 1]));
        assert!((c.gini - 0.5).abs() < 1e-12);
        assert_eq!(c.level, ConcentrationLevel::Medium);
    }
}
