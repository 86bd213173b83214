use crate::core::Time;
use crate::evaluation::{Accumulator, MeanAccumulator, Measurement};
use tracing::debug;

/// One `(estimate, actual)` pair, both in whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub estimate_ms: i64,
    pub actual_ms: i64,
}

/// Largest actual sample seen and its position in the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxActual {
    pub rtt_ms: f64,
    pub index: usize,
}

/// Teardown report of an estimator's accuracy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticsSummary {
    pub mean_absolute_error_ms: f64,
    pub sample_count: usize,
    pub max_actual: Option<MaxActual>,
}

impl DiagnosticsSummary {
    pub fn measurements(&self) -> Vec<Measurement> {
        let mut m = vec![
            Measurement::new("mean_absolute_error_ms", self.mean_absolute_error_ms),
            Measurement::new("sample_count", self.sample_count as f64),
        ];
        if let Some(max) = self.max_actual {
            m.push(Measurement::new("max_actual_rtt_ms", max.rtt_ms));
            m.push(Measurement::new("max_actual_index", max.index as f64));
        }
        m
    }
}

/// Append-only log of what an estimator predicted versus what was observed.
///
/// The log survives estimator resets. The summary is emitted at most once,
/// through [`Diagnostics::flush`].
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<DiagnosticEntry>,
    track_max_actual: bool,
    flushed: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that additionally reports the largest actual sample.
    pub fn with_max_actual() -> Self {
        Self {
            track_max_actual: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn record(&mut self, estimate: Time, actual: Time) {
        self.entries.push(DiagnosticEntry {
            estimate_ms: estimate.as_millis(),
            actual_ms: actual.as_millis(),
        });
    }

    pub fn entries(&self) -> &[DiagnosticEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Computes the summary without consuming the one-shot flush.
    pub fn summary(&self) -> Option<DiagnosticsSummary> {
        if self.entries.is_empty() {
            return None;
        }

        let mut error = MeanAccumulator::default();
        let mut biggest_actual = 0.0;
        let mut biggest_index = 0;
        for (i, e) in self.entries.iter().enumerate() {
            let actual = e.actual_ms as f64;
            if actual > biggest_actual {
                biggest_actual = actual;
                biggest_index = i;
            }
            error.add((e.estimate_ms as f64 - actual).abs());
        }

        Some(DiagnosticsSummary {
            mean_absolute_error_ms: error.value(),
            sample_count: self.entries.len(),
            max_actual: self.track_max_actual.then_some(MaxActual {
                rtt_ms: biggest_actual,
                index: biggest_index,
            }),
        })
    }

    /// Emits the summary on the first call, `None` afterwards or when empty.
    pub fn flush(&mut self, estimator: &str) -> Option<DiagnosticsSummary> {
        if self.flushed {
            return None;
        }
        self.flushed = true;

        let summary = self.summary()?;
        match summary.max_actual {
            Some(max) => debug!(
                estimator,
                mean_error_ms = summary.mean_absolute_error_ms,
                weight = summary.sample_count,
                max_actual_ms = max.rtt_ms,
                max_index = max.index,
                "mean error"
            ),
            None => debug!(
                estimator,
                mean_error_ms = summary.mean_absolute_error_ms,
                weight = summary.sample_count,
                "mean error"
            ),
        }
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(pairs: &[(i64, i64)], track_max: bool) -> Diagnostics {
        let mut d = if track_max {
            Diagnostics::with_max_actual()
        } else {
            Diagnostics::new()
        };
        for &(est, act) in pairs {
            d.record(Time::from_millis(est), Time::from_millis(act));
        }
        d
    }

    #[test]
    fn empty_log_has_no_summary() {
        let mut d = Diagnostics::new();
        assert!(d.is_empty());
        assert!(d.summary().is_none());
        assert!(d.flush("test").is_none());
    }

    #[test]
    fn mean_absolute_error_over_all_entries() {
        let d = log(&[(1000, 100), (100, 100), (100, 130)], false);
        let s = d.summary().unwrap();
        assert!((s.mean_absolute_error_ms - 310.0).abs() < 1e-12);
        assert_eq!(s.sample_count, 3);
        assert!(s.max_actual.is_none());
    }

    #[test]
    fn max_actual_keeps_first_index_of_largest() {
        let d = log(&[(0, 20), (0, 90), (0, 40), (0, 90)], true);
        let max = d.summary().unwrap().max_actual.unwrap();
        assert_eq!(max.rtt_ms, 90.0);
        assert_eq!(max.index, 1);
    }

    #[test]
    fn entries_store_truncated_millis() {
        let mut d = Diagnostics::new();
        d.record(Time::from_ticks(1_999_999), Time::from_seconds(0.1005));
        assert_eq!(
            d.entries(),
            &[DiagnosticEntry {
                estimate_ms: 1,
                actual_ms: 100
            }]
        );
    }

    #[test]
    fn flush_emits_exactly_once() {
        let mut d = log(&[(10, 20)], false);
        assert!(d.flush("test").is_some());
        assert!(d.is_flushed());
        assert!(d.flush("test").is_none());
        // the log itself stays readable after the flush
        assert!(d.summary().is_some());
    }

    #[test]
    fn summary_as_measurements() {
        let s = log(&[(10, 20), (30, 50)], true).summary().unwrap();
        let m = s.measurements();
        assert_eq!(Measurement::find(&m, "mean_absolute_error_ms"), Some(15.0));
        assert_eq!(Measurement::find(&m, "sample_count"), Some(2.0));
        assert_eq!(Measurement::find(&m, "max_actual_rtt_ms"), Some(50.0));
        assert_eq!(Measurement::find(&m, "max_actual_index"), Some(1.0));
    }
}
