use crate::core::Time;
use crate::streams::SampleStream;
use std::io::{Error, ErrorKind};

/// Replays a fixed list of samples.
#[derive(Debug, Clone)]
pub struct VecSampleStream {
    samples: Vec<Time>,
    idx: usize,
}

impl VecSampleStream {
    pub fn new(samples: Vec<Time>) -> Result<Self, Error> {
        if let Some(bad) = samples.iter().find(|s| s.is_negative()) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("negative RTT sample {bad}"),
            ));
        }
        Ok(Self { samples, idx: 0 })
    }

    pub fn from_millis(samples: &[i64]) -> Result<Self, Error> {
        Self::new(samples.iter().copied().map(Time::from_millis).collect())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleStream for VecSampleStream {
    fn has_more_samples(&self) -> bool {
        self.idx < self.samples.len()
    }

    fn next_sample(&mut self) -> Option<Time> {
        let s = self.samples.get(self.idx).copied()?;
        self.idx += 1;
        Some(s)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
