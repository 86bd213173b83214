use crate::estimators::EstimatorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Estimator(#[from] EstimatorError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
