use crate::config::EstimatorKind;
use crate::core::Time;
use crate::estimators::error::{check_gain, check_initial_estimate};
use crate::estimators::rtt_estimator::EstimatorState;
use crate::estimators::{EstimatorError, RttEstimator};
use crate::evaluation::{Diagnostics, DiagnosticsSummary};
use tracing::trace;

/// Tolerance used to recognise a gain as the reciprocal of a power of two.
const TOLERANCE: f64 = 1e-6;

/// Classic mean-deviation estimator (Jacobson/Karels).
///
/// `srtt <- (1 - alpha) * srtt + alpha * m`
/// `rttvar <- (1 - beta) * rttvar + beta * |srtt - m|`
///
/// When both gains are one of 1/2, 1/4, 1/8, 1/16 or 1/32 the update runs
/// on integer ticks with shifts, which is exactly the kernel formulation.
/// Any other pair of gains goes through floating point seconds.
#[derive(Debug)]
pub struct MeanDeviation {
    state: EstimatorState,
    alpha: f64,
    beta: f64,
}

impl MeanDeviation {
    pub const DEFAULT_ALPHA: f64 = 0.125;
    pub const DEFAULT_BETA: f64 = 0.25;

    pub fn new(initial_estimate: Time, alpha: f64, beta: f64) -> Result<Self, EstimatorError> {
        Ok(Self {
            state: EstimatorState::new(check_initial_estimate(initial_estimate)?, Diagnostics::new()),
            alpha: check_gain("alpha", alpha)?,
            beta: check_gain("beta", beta)?,
        })
    }

    pub fn with_default_gains(initial_estimate: Time) -> Result<Self, EstimatorError> {
        Self::new(initial_estimate, Self::DEFAULT_ALPHA, Self::DEFAULT_BETA)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Shift amount for a gain of `1 / 2^shift`, or 0 when the gain is not
    /// one of the supported reciprocals.
    fn reciprocal_power_of_two_shift(val: f64) -> u32 {
        if val < TOLERANCE {
            return 0;
        }
        [(2.0, 1), (4.0, 2), (8.0, 3), (16.0, 4), (32.0, 5)]
            .into_iter()
            .find(|(k, _)| (1.0 / val - k).abs() < TOLERANCE)
            .map_or(0, |(_, shift)| shift)
    }

    /// `(rtt_shift, variation_shift)` when the integer path applies.
    fn integer_shifts(&self) -> Option<(u32, u32)> {
        let rtt_shift = Self::reciprocal_power_of_two_shift(self.alpha);
        let variation_shift = Self::reciprocal_power_of_two_shift(self.beta);
        (rtt_shift != 0 && variation_shift != 0).then_some((rtt_shift, variation_shift))
    }

    fn floating_point_update(&mut self, m: Time) {
        let srtt = self.state.estimated_rtt.as_seconds();
        let rttvar = self.state.estimated_variation.as_seconds();
        let err = m.as_seconds() - srtt;
        self.state.estimated_rtt = Time::from_seconds(srtt + self.alpha * err);
        self.state.estimated_variation =
            Time::from_seconds(rttvar + self.beta * (err.abs() - rttvar));
    }

    /// Shift arithmetic on `i128` so that `srtt << shift` cannot overflow.
    fn integer_update(&mut self, m: Time, rtt_shift: u32, variation_shift: u32) {
        let srtt = i128::from(self.state.estimated_rtt.ticks());
        let mut delta = i128::from(m.ticks()) - srtt;
        self.state.estimated_rtt = saturating_time(((srtt << rtt_shift) + delta) >> rtt_shift);

        let rttvar = i128::from(self.state.estimated_variation.ticks());
        delta = delta.abs() - rttvar;
        self.state.estimated_variation =
            saturating_time(((rttvar << variation_shift) + delta) >> variation_shift);
    }
}

fn saturating_time(ticks: i128) -> Time {
    Time::from_ticks(ticks.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

impl RttEstimator for MeanDeviation {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::MeanDeviation
    }

    fn initial_estimate(&self) -> Time {
        self.state.initial_estimate
    }

    fn estimate(&self) -> Time {
        self.state.estimated_rtt
    }

    fn variation(&self) -> Time {
        self.state.estimated_variation
    }

    fn sample_count(&self) -> u32 {
        self.state.sample_count
    }

    fn measurement(&mut self, m: Time) -> Result<(), EstimatorError> {
        if m.is_negative() {
            return Err(EstimatorError::InvalidSample(m));
        }
        self.state.diagnostics.record(self.state.estimated_rtt, m);

        if self.state.sample_count == 0 {
            self.state.seed(m);
        } else if let Some((rtt_shift, variation_shift)) = self.integer_shifts() {
            self.integer_update(m, rtt_shift, variation_shift);
            trace!(rtt_shift, variation_shift, srtt = %self.state.estimated_rtt, "integer update");
        } else {
            self.floating_point_update(m);
            trace!(srtt = %self.state.estimated_rtt, "floating point update");
        }
        self.state.count_sample();
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn copy(&self) -> Box<dyn RttEstimator> {
        Box::new(Self {
            state: EstimatorState::new(self.state.initial_estimate, Diagnostics::new()),
            alpha: self.alpha,
            beta: self.beta,
        })
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.state.diagnostics
    }

    fn finalize(&mut self) -> Option<DiagnosticsSummary> {
        self.state.diagnostics.flush(self.kind().into())
    }
}

impl Drop for MeanDeviation {
    fn drop(&mut self) {
        self.finalize();
    }
}
