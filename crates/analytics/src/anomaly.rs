use serde::Serialize;
use spendlens_core::Money;

/// Default number of standard deviations from the mean beyond which an amount is anomalous.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Mean and population standard deviation of a set of amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl Distribution {
    /// `None` for an empty slice.
    pub fn of(amounts: &[Money]) -> Option<Self> {
        let first = amounts.first()?;
        let n = amounts.len() as f64;
        let values: Vec<f64> = amounts.iter().map(|a| a.to_f64()).collect();
        let mean = values.iter().sum::<f64>() / n;

        // Identical amounts must give exactly zero spread; float rounding of the mean would not.
        if amounts.iter().all(|a| a == first) {
            return Some(Distribution { mean, std_dev: 0.0 });
        }

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Distribution {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// `None` when the spread is zero.
    pub fn z_score(&self, amount: Money) -> Option<f64> {
        if self.std_dev == 0.0 {
            return None;
        }
        Some((amount.to_f64() - self.mean).abs() / self.std_dev)
    }
}

/// Flags amounts that sit far from the rest of their dataset.
///
/// Flags are relative to the slice or set passed in and change whenever it does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_Z_THRESHOLD)
    }
}

impl AnomalyDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// One flag per amount, in input order.
    pub fn flags(&self, amounts: &[Money]) -> Vec<bool> {
        let Some(distribution) = Distribution::of(amounts) else {
            return Vec::new();
        };
        amounts
            .iter()
            .map(|a| {
                distribution
                    .z_score(*a)
                    .is_some_and(|z| z > self.threshold)
            })
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(values: &[i64]) -> Vec<Money> {
        values.iter().map(|v| Money::from_cents(v * 100)).collect()
    }

    #[test]
    fn single_outlier_is_flagged() {
        let mut values = vec![-1000; 19];
        values.push(-100_000);
        let flags = AnomalyDetector::default().flags(&money(&values));
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        assert!(flags[19]);
    }

    #[test]
    fn identical_amounts_are_never_anomalous() {
        let amounts = vec![Money::from_cents(10); 7];
        for threshold in [0.0, 0.5, 3.0] {
            let flags = AnomalyDetector::new(threshold).flags(&amounts);
            assert!(flags.iter().all(|f| !f));
        }
    }

    #[test]
    fn small_sets_cannot_exceed_default_threshold() {
        // Population z-scores are bounded by sqrt(n - 1).
        let flags = AnomalyDetector::default().flags(&money(&[1, 1, 1, 1, 500]));
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn lower_threshold_flags_more() {
        let amounts = money(&[-50, -60, -55, -45, -52, -58, -48, -51, -900, 30_000]);
        let strict = AnomalyDetector::default().flags(&amounts);
        let loose = AnomalyDetector::new(1.0).flags(&amounts);
        assert!(loose.iter().filter(|f| **f).count() >= strict.iter().filter(|f| **f).count());
        assert!(loose[9]);
    }

    #[test]
    fn empty_input_yields_no_flags() {
        assert!(AnomalyDetector::default().flags(&[]).is_empty());
        assert_eq!(Distribution::of(&[]), None);
    }

    #[test]
    fn distribution_uses_population_std_dev() {
        let d = Distribution::of(&money(&[2, 4, 4, 4, 5, 5, 7, 9])).unwrap();
        assert!((d.mean - 5.0).abs() < 1e-9);
        assert!((d.std_dev - 2.0).abs() < 1e-9);
    }
}
