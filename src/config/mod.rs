mod build;
mod choices;

pub use build::build_estimator;
pub use choices::*;
