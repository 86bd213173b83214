use crate::core::Time;
use std::fmt::{Display, Formatter, Result};

/// Estimator state captured after a given number of samples.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Snapshot {
    pub samples_seen: u64,
    pub sample: Time,
    pub estimate: Time,
    pub variation: Time,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "seen={}, sample={}ms, srtt={}ms, rttvar={}ms",
            self.samples_seen,
            self.sample.as_millis(),
            self.estimate.as_millis(),
            self.variation.as_millis()
        )
    }
}
