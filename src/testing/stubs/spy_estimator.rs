use crate::config::EstimatorKind;
use crate::core::Time;
use crate::estimators::{EstimatorError, RttEstimator};
use crate::evaluation::{Diagnostics, DiagnosticsSummary};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Counters {
    measurements: AtomicUsize,
    resets: AtomicUsize,
    finalizations: AtomicUsize,
}

/// Read side of a [`SpyEstimator`], usable after the estimator was moved.
#[derive(Debug, Clone)]
pub struct SpyHandle(Arc<Counters>);

impl SpyHandle {
    pub fn measurements(&self) -> usize {
        self.0.measurements.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> usize {
        self.0.resets.load(Ordering::Relaxed)
    }

    pub fn finalizations(&self) -> usize {
        self.0.finalizations.load(Ordering::Relaxed)
    }
}

/// Wraps a real estimator and counts the calls made on it.
#[derive(Debug)]
pub struct SpyEstimator {
    inner: Box<dyn RttEstimator>,
    counters: Arc<Counters>,
}

impl SpyEstimator {
    pub fn new(inner: Box<dyn RttEstimator>) -> (Self, SpyHandle) {
        let counters = Arc::new(Counters::default());
        (
            Self {
                inner,
                counters: Arc::clone(&counters),
            },
            SpyHandle(counters),
        )
    }
}

impl RttEstimator for SpyEstimator {
    fn kind(&self) -> EstimatorKind {
        self.inner.kind()
    }

    fn initial_estimate(&self) -> Time {
        self.inner.initial_estimate()
    }

    fn estimate(&self) -> Time {
        self.inner.estimate()
    }

    fn variation(&self) -> Time {
        self.inner.variation()
    }

    fn sample_count(&self) -> u32 {
        self.inner.sample_count()
    }

    fn measurement(&mut self, sample: Time) -> Result<(), EstimatorError> {
        self.counters.measurements.fetch_add(1, Ordering::Relaxed);
        self.inner.measurement(sample)
    }

    fn reset(&mut self) {
        self.counters.resets.fetch_add(1, Ordering::Relaxed);
        self.inner.reset();
    }

    fn copy(&self) -> Box<dyn RttEstimator> {
        self.inner.copy()
    }

    fn diagnostics(&self) -> &Diagnostics {
        self.inner.diagnostics()
    }

    fn finalize(&mut self) -> Option<DiagnosticsSummary> {
        self.counters.finalizations.fetch_add(1, Ordering::Relaxed);
        self.inner.finalize()
    }
}
