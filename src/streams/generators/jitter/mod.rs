mod jitter_generator;

pub use jitter_generator::JitterGenerator;
