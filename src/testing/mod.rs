pub mod dummies;
pub mod stubs;

pub use dummies::samples_ms;
pub use stubs::{SpyEstimator, SpyHandle};
