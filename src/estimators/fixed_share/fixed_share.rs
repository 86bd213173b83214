use crate::config::EstimatorKind;
use crate::core::Time;
use crate::estimators::error::{check_gain, check_initial_estimate};
use crate::estimators::fixed_share::ExpertPool;
use crate::estimators::rtt_estimator::EstimatorState;
use crate::estimators::{EstimatorError, RttEstimator};
use crate::evaluation::{Diagnostics, DiagnosticsSummary};
use tracing::{error, trace};

/// Online-learning RTT estimator over a fixed pool of candidate RTTs.
///
/// Every sample after the first one:
/// 1. predicts the RTT as the weighted mean of the experts;
/// 2. scales each weight by `exp(-learning_rate * loss)`;
/// 3. mixes an `alpha` share of the total weight back uniformly, so experts
///    that lost weight can recover when the path changes;
/// 4. tracks the variation against the previous estimate with gain `beta`.
///
/// [`reset`](RttEstimator::reset) keeps everything: the learned weights are
/// the point of this estimator, and a retransmission backoff does not make
/// them wrong.
#[derive(Debug)]
pub struct FixedShare {
    state: EstimatorState,
    pool: ExpertPool,
    alpha: f64,
    beta: f64,
    learning_rate: f64,
    degenerate: Option<f64>,
}

impl FixedShare {
    pub const DEFAULT_NUM_EXPERTS: usize = 100;
    pub const DEFAULT_ALPHA: f64 = 0.08;
    pub const DEFAULT_BETA: f64 = 0.25;
    pub const DEFAULT_LEARNING_RATE: f64 = 2.0;

    pub fn new(
        initial_estimate: Time,
        num_experts: usize,
        alpha: f64,
        beta: f64,
        learning_rate: f64,
    ) -> Result<Self, EstimatorError> {
        let pool = ExpertPool::new(num_experts)?;
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(EstimatorError::invalid(
                "learning_rate",
                format!("must be a finite value > 0, got {learning_rate}"),
            ));
        }

        Ok(Self {
            state: EstimatorState::new(
                check_initial_estimate(initial_estimate)?,
                Diagnostics::with_max_actual(),
            ),
            pool,
            alpha: check_gain("alpha", alpha)?,
            beta: check_gain("beta", beta)?,
            learning_rate,
            degenerate: None,
        })
    }

    pub fn with_defaults(initial_estimate: Time) -> Result<Self, EstimatorError> {
        Self::new(
            initial_estimate,
            Self::DEFAULT_NUM_EXPERTS,
            Self::DEFAULT_ALPHA,
            Self::DEFAULT_BETA,
            Self::DEFAULT_LEARNING_RATE,
        )
    }

    pub fn num_experts(&self) -> usize {
        self.pool.len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn pool(&self) -> &ExpertPool {
        &self.pool
    }

    /// `true` once the weights collapsed; the instance is unusable from then on.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate.is_some()
    }

    fn poison(&mut self, err: EstimatorError) -> EstimatorError {
        if let EstimatorError::DegenerateWeightSum(sum) = err {
            error!(sum, samples = self.state.sample_count, "expert weights collapsed");
            self.degenerate = Some(sum);
        }
        err
    }
}

impl RttEstimator for FixedShare {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::FixedShare
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

    fn measurement(&mut self, measure: Time) -> Result<(), EstimatorError> {
        if let Some(sum) = self.degenerate {
            return Err(EstimatorError::DegenerateWeightSum(sum));
        }
        if measure.is_negative() {
            return Err(EstimatorError::InvalidSample(measure));
        }

        if self.state.sample_count == 0 {
            self.state.diagnostics.record(self.state.estimated_rtt, measure);
            self.state.seed(measure);
            self.state.count_sample();
            return Ok(());
        }

        let actual_rtt = measure.as_seconds();
        let predicted = match self.pool.predict() {
            Ok(p) => p,
            Err(e) => return Err(self.poison(e)),
        };
        if let Err(e) = self
            .pool
            .update(actual_rtt, self.learning_rate, self.alpha)
        {
            return Err(self.poison(e));
        }

        let old_estimate = self.state.estimated_rtt;
        self.state.diagnostics.record(old_estimate, measure);
        self.state.estimated_rtt = Time::from_seconds(predicted);

        let old_variation = self.state.estimated_variation.as_seconds();
        let deviation = (actual_rtt - old_estimate.as_seconds()).abs();
        self.state.estimated_variation =
            Time::from_seconds((1.0 - self.beta) * old_variation + self.beta * deviation);
        self.state.count_sample();

        trace!(
            actual = %measure,
            srtt = %self.state.estimated_rtt,
            rttvar = %self.state.estimated_variation,
            best_expert = self.pool.best_expert(),
            "fixed-share update"
        );
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy(&self) -> Box<dyn RttEstimator> {
        Box::new(Self {
            state: EstimatorState::new(self.state.initial_estimate, Diagnostics::with_max_actual()),
            pool: self.pool.fresh(),
            alpha: self.alpha,
            beta: self.beta,
            learning_rate: self.learning_rate,
            degenerate: None,
        })
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.state.diagnostics
    }

    fn finalize(&mut self) -> Option<DiagnosticsSummary> {
        self.state.diagnostics.flush(self.kind().into())
    }
}

impl Drop for FixedShare {
    fn drop(&mut self) {
        self.finalize();
    }
}
