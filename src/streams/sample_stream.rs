use crate::core::Time;
use std::io::Error;

/// Pull-based source of RTT samples, in the order they were observed.
///
/// Implementations may represent recorded traces or unbounded synthetic
/// generators. Every sample yielded is non-negative.
pub trait SampleStream {
    /// Indicates whether the stream *may* produce more samples.
    ///
    /// Finite streams return `false` once exhausted; if it returns `false`,
    /// a subsequent call to [`next_sample`] must return `None`.
    fn has_more_samples(&self) -> bool;

    /// Produces the next sample, or `None` if the stream is exhausted.
    fn next_sample(&mut self) -> Option<Time>;

    /// Rewinds to the first sample. Generators re-seed their RNG so the
    /// same sequence is produced again.
    fn restart(&mut self) -> Result<(), Error>;
}
