use crate::config::EstimatorKind;
use crate::core::Time;
use crate::estimators::EstimatorError;
use crate::evaluation::{Diagnostics, DiagnosticsSummary};
use std::fmt::Debug;

/// Round-trip time estimator fed by one connection's RTT samples.
///
/// Samples must be delivered in the order they were observed. An instance is
/// owned by exactly one connection; [`copy`] produces an independent one.
///
/// Dropping an estimator finalizes it, so the diagnostics summary is emitted
/// exactly once whether teardown goes through [`finalize`] or not.
pub trait RttEstimator: Debug + Send {
    /// Which algorithm this is.
    fn kind(&self) -> EstimatorKind;

    /// Configured starting estimate.
    fn initial_estimate(&self) -> Time;

    /// Current smoothed RTT.
    fn estimate(&self) -> Time;

    /// Current RTT variation.
    fn variation(&self) -> Time;

    /// Samples taken since construction (or the last effective reset).
    fn sample_count(&self) -> u32;

    /// Feeds one RTT sample.
    ///
    /// Fails with [`EstimatorError::InvalidSample`] for a negative sample, in
    /// which case nothing changes.
    fn measurement(&mut self, sample: Time) -> Result<(), EstimatorError>;

    /// Returns the estimator to its configured starting point. The
    /// diagnostics log is kept.
    fn reset(&mut self);

    /// Fresh instance with the same configuration and no history.
    fn copy(&self) -> Box<dyn RttEstimator>;

    /// Every `(estimate, actual)` pair seen so far.
    fn diagnostics(&self) -> &Diagnostics;

    /// Emits the diagnostics summary. Returns `None` when no sample was
    /// recorded or when the summary was already emitted.
    fn finalize(&mut self) -> Option<DiagnosticsSummary>;
}

/// Fields every estimator carries.
#[derive(Debug, Clone)]
pub(crate) struct EstimatorState {
    pub initial_estimate: Time,
    pub estimated_rtt: Time,
    pub estimated_variation: Time,
    pub sample_count: u32,
    pub diagnostics: Diagnostics,
}

impl EstimatorState {
    pub fn new(initial_estimate: Time, diagnostics: Diagnostics) -> Self {
        Self {
            initial_estimate,
            estimated_rtt: initial_estimate,
            estimated_variation: Time::ZERO,
            sample_count: 0,
            diagnostics,
        }
    }

    pub fn reset(&mut self) {
        self.estimated_rtt = self.initial_estimate;
        self.estimated_variation = Time::ZERO;
        self.sample_count = 0;
    }

    /// First sample: the estimate is the sample, the variation half of it.
    pub fn seed(&mut self, sample: Time) {
        self.estimated_rtt = sample;
        self.estimated_variation = sample / 2;
        tracing::trace!(
            srtt_ms = self.estimated_rtt.as_millis(),
            rttvar_ms = self.estimated_variation.as_millis(),
            "first sample"
        );
    }

    #[inline]
    pub fn count_sample(&mut self) {
        self.sample_count = self.sample_count.saturating_add(1);
    }
}
