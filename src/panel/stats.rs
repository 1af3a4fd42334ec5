use crate::panel::constants::{
    ACCEPTABLE_LATENCY_MS, FAST_LATENCY_MS, HISTOGRAM_HIGH_BOUND_MS, HISTOGRAM_LOW_BOUND_MS,
    HISTOGRAM_SIGNIFICANT_DIGITS,
};
use crate::panel::error::{PanelError, Result};
use hdrhistogram::Histogram;
use tracing::debug;

/// Running latency summary behind the footer line.
///
/// Fed one sample per admitted request and emptied together with the
/// ledger, so the footer always describes exactly the rows on screen.
/// Besides the histogram it tallies the same fast/acceptable/slow bands
/// the row renderer colors latencies with. Samples beyond the histogram's
/// upper bound saturate; the footer reports screen-scale latencies, not
/// outlier forensics.
pub struct LatencySummary {
    hist: Histogram<u64>,
    fast: u64,
    acceptable: u64,
    slow: u64,
}

impl LatencySummary {
    pub fn new() -> Result<Self> {
        let hist = Histogram::new_with_bounds(
            HISTOGRAM_LOW_BOUND_MS,
            HISTOGRAM_HIGH_BOUND_MS,
            HISTOGRAM_SIGNIFICANT_DIGITS,
        )
        .map_err(|e| PanelError::Render(format!("Failed to create latency histogram: {}", e)))?;
        Ok(Self {
            hist,
            fast: 0,
            acceptable: 0,
            slow: 0,
        })
    }

    /// Fold in one admitted request's latency
    pub fn record(&mut self, latency_ms: u64) {
        self.hist.saturating_record(latency_ms);
        if latency_ms < FAST_LATENCY_MS {
            self.fast += 1;
        } else if latency_ms < ACCEPTABLE_LATENCY_MS {
            self.acceptable += 1;
        } else {
            self.slow += 1;
        }
    }

    /// Forget all samples; paired with clearing the ledger
    pub fn reset(&mut self) {
        debug!(samples = self.hist.len(), "Resetting latency summary");
        self.hist.reset();
        self.fast = 0;
        self.acceptable = 0;
        self.slow = 0;
    }

    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    pub fn mean(&self) -> f64 {
        self.hist.mean()
    }

    pub fn min(&self) -> u64 {
        if self.hist.is_empty() {
            0
        } else {
            self.hist.min()
        }
    }

    pub fn max(&self) -> u64 {
        if self.hist.is_empty() {
            0
        } else {
            self.hist.max()
        }
    }

    pub fn percentile(&self, quantile: f64) -> u64 {
        self.hist.value_at_quantile(quantile)
    }

    pub fn fast_count(&self) -> u64 {
        self.fast
    }

    pub fn acceptable_count(&self) -> u64 {
        self.acceptable
    }

    pub fn slow_count(&self) -> u64 {
        self.slow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_of(latencies: &[u64]) -> LatencySummary {
        let mut summary = LatencySummary::new().unwrap();
        for &latency in latencies {
            summary.record(latency);
        }
        summary
    }

    #[test]
    fn test_summary_tracks_extremes_and_count() {
        let summary = summary_of(&[10, 20, 30, 40, 50]);
        assert_eq!(summary.count(), 5);
        assert_eq!(summary.min(), 10);
        assert_eq!(summary.max(), 50);
        assert!((summary.mean() - 30.0).abs() < 0.5);
    }

    #[test]
    fn test_summary_empty_reads_as_zero() {
        let summary = LatencySummary::new().unwrap();
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.min(), 0);
        assert_eq!(summary.max(), 0);
    }

    #[test]
    fn test_band_counts_follow_color_thresholds() {
        let summary = summary_of(&[50, 99, 100, 499, 500, 2000]);
        assert_eq!(summary.fast_count(), 2);
        assert_eq!(summary.acceptable_count(), 2);
        assert_eq!(summary.slow_count(), 2);
    }

    #[test]
    fn test_reset_forgets_samples() {
        let mut summary = summary_of(&[10, 600]);
        summary.reset();
        assert_eq!(summary.count(), 0);
        assert_eq!(summary.slow_count(), 0);
        assert_eq!(summary.max(), 0);
    }

    #[test]
    fn test_outliers_saturate_at_histogram_bound() {
        let summary = summary_of(&[5, 500_000]);
        assert_eq!(summary.count(), 2);
        assert!(summary.max() >= HISTOGRAM_HIGH_BOUND_MS);
        assert_eq!(summary.slow_count(), 1);
    }
}
