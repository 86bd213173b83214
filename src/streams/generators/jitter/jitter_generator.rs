use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::Time;
use crate::streams::SampleStream;

/// Synthetic path: a base RTT plus uniform queueing jitter, with an optional
/// route change that moves the base after a given number of samples.
#[derive(Debug)]
pub struct JitterGenerator {
    seed: u64,
    rng: StdRng,
    base: Time,
    jitter: Time,
    level_shift: Option<(u64, Time)>,
    max_samples: Option<u64>,
    produced: u64,
}

impl JitterGenerator {
    /// Samples are drawn from `[base, base + jitter)`.
    pub fn new(
        base: Time,
        jitter: Time,
        max_samples: Option<u64>,
        seed: u64,
    ) -> Result<Self, Error> {
        if base.is_negative() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Base RTT must be non-negative",
            ));
        }
        if jitter.is_negative() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Jitter must be non-negative",
            ));
        }

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            base,
            jitter,
            level_shift: None,
            max_samples,
            produced: 0,
        })
    }

    /// From sample index `at` on, the base RTT becomes `new_base`.
    pub fn with_level_shift(mut self, at: u64, new_base: Time) -> Result<Self, Error> {
        if new_base.is_negative() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Shifted base RTT must be non-negative",
            ));
        }
        self.level_shift = Some((at, new_base));
        Ok(self)
    }

    #[inline]
    fn current_base(&self) -> Time {
        match self.level_shift {
            Some((at, new_base)) if self.produced >= at => new_base,
            _ => self.base,
        }
    }

    #[inline]
    fn gen_jitter(&mut self) -> Time {
        if self.jitter == Time::ZERO {
            return Time::ZERO;
        }
        Time::from_ticks(self.rng.random_range(0..self.jitter.ticks()))
    }
}

impl SampleStream for JitterGenerator {
    fn has_more_samples(&self) -> bool {
        self.max_samples.map_or(true, |max| self.produced < max)
    }

    fn next_sample(&mut self) -> Option<Time> {
        if !self.has_more_samples() {
            return None;
        }
        let sample = self.current_base() + self.gen_jitter();
        self.produced += 1;
        Some(sample)
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(generator: &mut JitterGenerator, n: usize) -> Vec<Time> {
        (0..n).map(|_| generator.next_sample().expect("sample")).collect()
    }

    #[test]
    fn samples_stay_in_range() {
        let base = Time::from_millis(40);
        let jitter = Time::from_millis(15);
        let mut generator = JitterGenerator::new(base, jitter, None, 3).unwrap();
        for s in take(&mut generator, 1_000) {
            assert!(s >= base && s < base + jitter, "sample {s}");
        }
    }

    #[test]
    fn zero_jitter_is_constant() {
        let mut generator =
            JitterGenerator::new(Time::from_millis(25), Time::ZERO, Some(5), 1).unwrap();
        assert!(take(&mut generator, 5).iter().all(|&s| s == Time::from_millis(25)));
        assert!(!generator.has_more_samples());
        assert!(generator.next_sample().is_none());
    }

    #[test]
    fn level_shift_moves_the_base() {
        let mut generator = JitterGenerator::new(Time::from_millis(20), Time::ZERO, None, 9)
            .unwrap()
            .with_level_shift(3, Time::from_millis(200))
            .unwrap();
        let got: Vec<i64> = take(&mut generator, 5).into_iter().map(Time::as_millis).collect();
        assert_eq!(got, vec![20, 20, 20, 200, 200]);
    }

    #[test]
    fn restart_resets_sequence_with_same_seed() {
        let mut generator =
            JitterGenerator::new(Time::from_millis(10), Time::from_millis(90), Some(100), 12345)
                .unwrap();
        let first = take(&mut generator, 30);
        generator.restart().unwrap();
        let second = take(&mut generator, 30);
        assert_eq!(first, second);
    }

    #[test]
    fn negative_parameters_are_rejected() {
        let neg = Time::from_millis(-1);
        assert!(JitterGenerator::new(neg, Time::ZERO, None, 0).is_err());
        assert!(JitterGenerator::new(Time::ZERO, neg, None, 0).is_err());
        let g = JitterGenerator::new(Time::ZERO, Time::ZERO, None, 0).unwrap();
        assert!(g.with_level_shift(1, neg).is_err());
    }
}
