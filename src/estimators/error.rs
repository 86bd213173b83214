use crate::core::Time;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    #[error("invalid sample: {0} is negative")]
    InvalidSample(Time),

    #[error("degenerate expert weight sum: {0}")]
    DegenerateWeightSum(f64),
}

impl EstimatorError {
    pub(crate) fn invalid<R: Into<String>>(parameter: &'static str, reason: R) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Gains must lie in `[0, 1]`.
pub(crate) fn check_gain(parameter: &'static str, value: f64) -> Result<f64, EstimatorError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EstimatorError::invalid(
            parameter,
            format!("must be in [0, 1], got {value}"),
        ))
    }
}

pub(crate) fn check_initial_estimate(value: Time) -> Result<Time, EstimatorError> {
    if value.is_negative() {
        Err(EstimatorError::invalid(
            "initial_estimate",
            format!("must be non-negative, got {value}"),
        ))
    } else {
        Ok(value)
    }
}
