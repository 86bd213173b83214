mod jitter;
mod vec_samples;

pub use jitter::JitterGenerator;
pub use vec_samples::VecSampleStream;
