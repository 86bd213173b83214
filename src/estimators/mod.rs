mod error;
pub mod fixed_share;
mod mean_deviation;
mod rtt_estimator;

pub use error::EstimatorError;
pub use fixed_share::FixedShare;
pub use mean_deviation::MeanDeviation;
pub use rtt_estimator::RttEstimator;
