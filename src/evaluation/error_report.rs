use crate::evaluation::{Accumulator, DiagnosticsSummary, MeanAccumulator, Measurement};

/// Aggregates teardown summaries of many estimators (e.g., every socket of
/// a simulation run) into one sample-weighted mean error.
///
/// Summaries built from a single sample carry no information about the
/// filter and are skipped.
#[derive(Debug, Default, Clone)]
pub struct ErrorReport {
    error: MeanAccumulator,
    runs: usize,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the summary was counted.
    pub fn add(&mut self, summary: &DiagnosticsSummary) -> bool {
        if summary.sample_count <= 1 || summary.mean_absolute_error_ms.is_nan() {
            return false;
        }
        self.error
            .add_weighted(summary.mean_absolute_error_ms, summary.sample_count as f64);
        self.runs += 1;
        true
    }

    pub fn average_error_ms(&self) -> Option<f64> {
        (self.runs > 0).then(|| self.error.value())
    }

    pub fn total_weight(&self) -> f64 {
        self.error.weight()
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn measurements(&self) -> Vec<Measurement> {
        vec![
            Measurement::new(
                "average_error_ms",
                self.average_error_ms().unwrap_or(f64::NAN),
            ),
            Measurement::new("total_weight", self.total_weight()),
            Measurement::new("runs", self.runs as f64),
        ]
    }
}

impl<'a> Extend<&'a DiagnosticsSummary> for ErrorReport {
    fn extend<I: IntoIterator<Item = &'a DiagnosticsSummary>>(&mut self, iter: I) {
        for s in iter {
            self.add(s);
        }
    }
}
