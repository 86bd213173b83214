mod samples;

pub use samples::samples_ms;
