pub mod generators;
mod sample_stream;

pub use generators::{JitterGenerator, VecSampleStream};
pub use sample_stream::SampleStream;
