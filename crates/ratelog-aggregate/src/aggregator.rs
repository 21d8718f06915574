//! Quote aggregation with outlier exclusion.

use std::cmp::Ordering;

use ratelog_types::LenderQuote;

use crate::AggregateStats;

/// Minimum number of quotes before fences are applied.
const MIN_QUOTES_FOR_FENCES: usize = 4;

/// Rule deciding which quotes may not be reported as the best APR.
///
/// Quotes flagged by the publisher are excluded under every policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierPolicy {
    /// Exclude quotes outside `[Q1 - k*IQR, Q3 + k*IQR]`, with quartiles
    /// interpolated linearly between order statistics. Only applied when
    /// there are at least four quotes.
    TukeyFences {
        /// Fence multiplier.
        k: f64,
    },
    /// Only publisher flags exclude quotes.
    None,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        Self::TukeyFences { k: 1.5 }
    }
}

/// Computes [`AggregateStats`] from a day's lender quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteAggregator {
    policy: OutlierPolicy,
}

impl QuoteAggregator {
    /// Creates an aggregator with the given outlier policy.
    #[must_use]
    pub const fn new(policy: OutlierPolicy) -> Self {
        Self { policy }
    }

    /// Returns the outlier policy.
    #[must_use]
    pub const fn policy(&self) -> OutlierPolicy {
        self.policy
    }

    /// Aggregates `quotes`.
    ///
    /// Quotes with a non-finite or non-positive APR are ignored. Returns
    /// `None` when no valid quote remains. The result does not depend on the
    /// input order.
    #[must_use]
    pub fn aggregate(&self, quotes: &[LenderQuote]) -> Option<AggregateStats> {
        let mut valid: Vec<&LenderQuote> = quotes
            .iter()
            .filter(|q| q.apr.is_finite() && q.apr > 0.0)
            .collect();
        if valid.is_empty() {
            return None;
        }
        valid.sort_by(|a, b| compare_quotes(a, b));

        let aprs: Vec<f64> = valid.iter().map(|q| q.apr).collect();
        let (low_fence, high_fence) = self.fences(&aprs);

        let best = valid
            .iter()
            .filter(|q| !q.is_flagged() && q.apr >= low_fence && q.apr <= high_fence)
            .copied()
            .collect::<Vec<_>>();

        Some(AggregateStats {
            count: aprs.len(),
            median: quantile(&aprs, 0.5),
            min: aprs[0],
            max: aprs[aprs.len() - 1],
            best_apr: best.first().map(|q| q.apr),
            best_institution: best.first().map(|q| q.institution.clone()),
            excluded: valid.len() - best.len(),
        })
    }

    /// Returns the inclusive band of acceptable APRs for sorted `aprs`.
    fn fences(&self, aprs: &[f64]) -> (f64, f64) {
        match self.policy {
            OutlierPolicy::TukeyFences { k } if aprs.len() >= MIN_QUOTES_FOR_FENCES => {
                let q1 = quantile(aprs, 0.25);
                let q3 = quantile(aprs, 0.75);
                let iqr = q3 - q1;
                (q1 - k * iqr, q3 + k * iqr)
            }
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

/// Aggregates `quotes` with the default policy (Tukey fences, k = 1.5).
#[must_use]
pub fn aggregate(quotes: &[LenderQuote]) -> Option<AggregateStats> {
    QuoteAggregator::default().aggregate(quotes)
}

fn compare_quotes(a: &LenderQuote, b: &LenderQuote) -> Ordering {
    a.apr
        .total_cmp(&b.apr)
        .then_with(|| a.institution.cmp(&b.institution))
}

/// Linear interpolation between order statistics of sorted, non-empty `sorted`.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    sorted[lower] + (h - lower as f64) * (sorted[upper] - sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quotes(aprs: &[f64]) -> Vec<LenderQuote> {
        aprs.iter()
            .enumerate()
            .map(|(i, apr)| LenderQuote::new(format!("Lender {i}"), *apr))
            .collect()
    }

    #[test]
    fn test_worked_example_excludes_high_outlier() {
        let stats = aggregate(&quotes(&[5.9, 6.0, 6.1, 6.2, 9.9])).unwrap();
        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.median, 6.1);
        assert_relative_eq!(stats.min, 5.9);
        assert_relative_eq!(stats.max, 9.9);
        assert_eq!(stats.best_apr, Some(5.9));
        assert_eq!(stats.best_institution.as_deref(), Some("Lender 0"));
        assert_eq!(stats.excluded, 1);
    }

    #[test]
    fn test_low_outlier_is_not_best() {
        let input = quotes(&[3.0, 6.0, 6.1, 6.2, 6.3]);

        let stats = aggregate(&input).unwrap();
        assert_eq!(stats.best_apr, Some(6.0));
        assert_relative_eq!(stats.min, 3.0);

        let unfenced = QuoteAggregator::new(OutlierPolicy::None)
            .aggregate(&input)
            .unwrap();
        assert_eq!(unfenced.best_apr, Some(3.0));
        assert_eq!(unfenced.excluded, 0);
    }

    #[test]
    fn test_even_count_median() {
        let stats = aggregate(&quotes(&[6.4, 6.0, 6.2, 6.8])).unwrap();
        assert_relative_eq!(stats.median, 6.3, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_is_none() {
        assert!(aggregate(&[]).is_none());
        assert!(aggregate(&quotes(&[f64::NAN, 0.0, -1.0])).is_none());
    }

    #[test]
    fn test_fences_need_four_quotes() {
        let stats = aggregate(&quotes(&[2.0, 6.0, 9.9])).unwrap();
        assert_eq!(stats.best_apr, Some(2.0));
        assert_eq!(stats.excluded, 0);
    }

    #[test]
    fn test_order_independent() {
        let forward = quotes(&[6.3, 5.9, 9.9, 6.1, 6.0]);
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(aggregate(&forward), aggregate(&reversed));
    }

    #[test]
    fn test_ties_resolved_by_institution() {
        let input = vec![
            LenderQuote::new("Zeta Bank", 5.9),
            LenderQuote::new("Alpha CU", 5.9),
        ];
        let stats = aggregate(&input).unwrap();
        assert_eq!(stats.best_institution.as_deref(), Some("Alpha CU"));
    }

    #[test]
    fn test_publisher_flag_excludes_quote() {
        let input = vec![
            LenderQuote::new("Teaser Loans", 4.9).flagged("promotional"),
            LenderQuote::new("Alpha CU", 6.0),
            LenderQuote::new("Beta Bank", 6.1),
        ];
        let stats = aggregate(&input).unwrap();
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.min, 4.9);
        assert_eq!(stats.best_apr, Some(6.0));
        assert_eq!(stats.best_institution.as_deref(), Some("Alpha CU"));
        assert_eq!(stats.excluded, 1);
    }

    #[test]
    fn test_everything_flagged_has_no_best() {
        let input = vec![LenderQuote::new("Only", 6.0).flagged("stale")];
        let stats = aggregate(&input).unwrap();
        assert_eq!(stats.best_apr, None);
        assert_eq!(stats.best_institution, None);
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&sorted, 0.25), 1.75);
        assert_relative_eq!(quantile(&sorted, 0.75), 3.25);
    }
}
