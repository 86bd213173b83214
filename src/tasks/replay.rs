use crate::core::Time;
use crate::estimators::RttEstimator;
use crate::evaluation::{DiagnosticsSummary, EstimateCurve, Snapshot};
use crate::streams::SampleStream;
use crate::tasks::TaskError;
use std::sync::mpsc::Sender;
use tracing::{debug, info};

/// Feeds one estimator from one sample stream, the way a connection feeds
/// its estimator as acknowledgments arrive.
pub struct ReplayTask {
    estimator: Box<dyn RttEstimator>,
    stream: Box<dyn SampleStream>,

    curve: EstimateCurve,

    max_samples: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    last_sample: Time,

    progress_tx: Option<Sender<Snapshot>>,
}

impl ReplayTask {
    pub fn new(
        estimator: Box<dyn RttEstimator>,
        stream: Box<dyn SampleStream>,
        max_samples: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, TaskError> {
        if sample_frequency == 0 {
            return Err(TaskError::InvalidParameter(
                "sample_frequency must be > 0".into(),
            ));
        }

        Ok(Self {
            estimator,
            stream,
            curve: EstimateCurve::default(),
            max_samples,
            sample_frequency,
            processed: 0,
            last_sample: Time::ZERO,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Replays the stream, then finalizes the estimator and returns its
    /// diagnostics summary.
    pub fn run(&mut self) -> Result<Option<DiagnosticsSummary>, TaskError> {
        info!(estimator = %self.estimator.kind(), "replay started");

        while self.stream.has_more_samples() {
            if let Some(n) = self.max_samples {
                if self.processed >= n {
                    break;
                }
            }
            let Some(sample) = self.stream.next_sample() else {
                break;
            };

            self.estimator.measurement(sample)?;
            self.processed += 1;
            self.last_sample = sample;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        let summary = self.estimator.finalize();
        info!(samples = self.processed, "replay finished");
        Ok(summary)
    }

    pub fn curve(&self) -> &EstimateCurve {
        &self.curve
    }

    pub fn estimator(&self) -> &dyn RttEstimator {
        self.estimator.as_ref()
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    fn push_snapshot(&mut self) {
        let snapshot = Snapshot {
            samples_seen: self.processed,
            sample: self.last_sample,
            estimate: self.estimator.estimate(),
            variation: self.estimator.variation(),
        };
        debug!(%snapshot, "snapshot");

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot);
        }
        self.curve.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::{EstimatorError, FixedShare, MeanDeviation};
    use crate::streams::{JitterGenerator, VecSampleStream};
    use crate::testing::{SpyEstimator, samples_ms};
    use std::sync::mpsc;

    fn md() -> Box<dyn RttEstimator> {
        Box::new(MeanDeviation::with_default_gains(Time::from_seconds(1.0)).unwrap())
    }

    fn constant(n: usize, ms: i64) -> Box<dyn SampleStream> {
        Box::new(VecSampleStream::new(vec![Time::from_millis(ms); n]).unwrap())
    }

    #[test]
    fn ctor_guards() {
        let err = ReplayTask::new(md(), constant(10, 100), None, 0).err().unwrap();
        assert!(matches!(err, TaskError::InvalidParameter(_)));
    }

    #[test]
    fn periodic_and_final_snapshots() {
        let mut task = ReplayTask::new(md(), constant(100, 100), None, 10).unwrap();
        let summary = task.run().unwrap().unwrap();

        assert_eq!(task.curve().len(), 11);
        let last = task.curve().latest().unwrap();
        assert_eq!(last.samples_seen, 100);
        assert_eq!(last.estimate, Time::from_millis(100));
        assert_eq!(last.variation, Time::ZERO);
        assert_eq!(summary.sample_count, 100);
        // only the first estimate (1s) was off
        assert!((summary.mean_absolute_error_ms - 9.0).abs() < 1e-12);
    }

    #[test]
    fn stops_at_max_samples() {
        let mut task = ReplayTask::new(md(), constant(1000, 50), Some(25), 5).unwrap();
        task.run().unwrap();
        assert_eq!(task.curve().len(), 6);
        assert_eq!(task.curve().latest().unwrap().samples_seen, 25);
        assert_eq!(task.estimator().sample_count(), 25);
    }

    #[test]
    fn snapshot_frequency_math() {
        let mut task = ReplayTask::new(md(), constant(12, 80), None, 5).unwrap();
        task.run().unwrap();
        assert_eq!(task.curve().len(), 3);
        assert_eq!(task.curve().latest().unwrap().samples_seen, 12);
    }

    #[test]
    fn empty_stream_reports_nothing() {
        let mut task = ReplayTask::new(md(), constant(0, 0), None, 5).unwrap();
        assert!(task.run().unwrap().is_none());
        assert_eq!(task.curve().len(), 1);
        let only = task.curve().latest().unwrap();
        assert_eq!(only.samples_seen, 0);
        assert_eq!(only.estimate, Time::from_seconds(1.0));
    }

    #[test]
    fn measurement_and_finalize_called_as_expected() {
        let (spy, handle) = SpyEstimator::new(md());
        let stream = Box::new(VecSampleStream::new(samples_ms(&[90, 110, 100, 95])).unwrap());
        let mut task = ReplayTask::new(Box::new(spy), stream, None, 2).unwrap();
        task.run().unwrap();
        assert_eq!(handle.measurements(), 4);
        assert_eq!(handle.finalizations(), 1);
    }

    /// Yields whatever it was given, negative values included.
    struct RawSamples(std::vec::IntoIter<Time>);

    impl SampleStream for RawSamples {
        fn has_more_samples(&self) -> bool {
            !self.0.as_slice().is_empty()
        }

        fn next_sample(&mut self) -> Option<Time> {
            self.0.next()
        }

        fn restart(&mut self) -> Result<(), std::io::Error> {
            Ok(())
        }
    }

    #[test]
    fn estimator_errors_propagate() {
        let fs = FixedShare::with_defaults(Time::from_seconds(1.0)).unwrap();
        let stream = Box::new(RawSamples(samples_ms(&[100, -3, 100]).into_iter()));
        let mut task = ReplayTask::new(Box::new(fs), stream, None, 1).unwrap();
        let err = task.run().unwrap_err();
        assert!(matches!(
            err,
            TaskError::Estimator(EstimatorError::InvalidSample(t)) if t == Time::from_millis(-3)
        ));
        assert_eq!(task.processed(), 1);
    }

    #[test]
    fn outliers_do_not_stop_a_fixed_share_replay() {
        let fs = FixedShare::with_defaults(Time::from_seconds(1.0)).unwrap();
        let stream = Box::new(VecSampleStream::new(samples_ms(&[100, 1_000_000_000, 100])).unwrap());
        let mut task = ReplayTask::new(Box::new(fs), stream, None, 1).unwrap();
        let summary = task.run().unwrap().unwrap();
        assert_eq!(task.processed(), 3);
        assert_eq!(summary.sample_count, 3);
        assert_eq!(summary.max_actual.unwrap().index, 1);
    }

    #[test]
    fn progress_channel_receives_every_snapshot() {
        let (tx, rx) = mpsc::channel();
        let stream = Box::new(
            JitterGenerator::new(Time::from_millis(30), Time::from_millis(10), Some(40), 11)
                .unwrap(),
        );
        let mut task = ReplayTask::new(md(), stream, None, 10).unwrap().with_progress(tx);
        task.run().unwrap();
        drop(task);

        let got: Vec<Snapshot> = rx.iter().collect();
        assert_eq!(got.len(), 5);
        assert!(got.iter().all(|s| s.estimate >= Time::from_millis(30)));
        assert!(got.iter().all(|s| s.estimate < Time::from_millis(40)));
    }

    #[test]
    fn fixed_share_tracks_a_route_change() {
        let stream = Box::new(
            JitterGenerator::new(Time::from_millis(20), Time::from_millis(5), Some(2_000), 5)
                .unwrap()
                .with_level_shift(1_000, Time::from_millis(150))
                .unwrap(),
        );
        let fs = FixedShare::with_defaults(Time::from_seconds(1.0)).unwrap();
        let mut task = ReplayTask::new(Box::new(fs), stream, None, 1_000).unwrap();
        task.run().unwrap();

        let snaps: Vec<Snapshot> = task.curve().iter().copied().collect();
        assert_eq!(snaps.len(), 3);
        let before = snaps[0].estimate;
        let after = snaps[1].estimate;
        assert!(after > before, "before={before}, after={after}");
        assert!(after >= Time::from_millis(100), "after={after}");
    }
}
