mod error;
mod replay;

pub use error::TaskError;
pub use replay::ReplayTask;
