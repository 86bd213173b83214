use crate::config::{EstimatorChoice, FixedShareParams, MeanDeviationParams};
use crate::core::Time;
use crate::estimators::{EstimatorError, FixedShare, MeanDeviation, RttEstimator};

fn initial_estimate(seconds: f64) -> Result<Time, EstimatorError> {
    if seconds.is_finite() {
        Ok(Time::from_seconds(seconds))
    } else {
        Err(EstimatorError::invalid(
            "initial_estimate",
            format!("must be finite, got {seconds}"),
        ))
    }
}

impl TryFrom<MeanDeviationParams> for MeanDeviation {
    type Error = EstimatorError;

    fn try_from(params: MeanDeviationParams) -> Result<Self, Self::Error> {
        MeanDeviation::new(
            initial_estimate(params.initial_estimate)?,
            params.alpha,
            params.beta,
        )
    }
}

impl TryFrom<FixedShareParams> for FixedShare {
    type Error = EstimatorError;

    fn try_from(params: FixedShareParams) -> Result<Self, Self::Error> {
        FixedShare::new(
            initial_estimate(params.initial_estimate)?,
            params.num_experts,
            params.alpha,
            params.beta,
            params.learning_rate,
        )
    }
}

/// Validates the configuration and builds the selected estimator.
pub fn build_estimator(choice: EstimatorChoice) -> Result<Box<dyn RttEstimator>, EstimatorError> {
    match choice {
        EstimatorChoice::MeanDeviation(p) => Ok(Box::new(MeanDeviation::try_from(p)?)),
        EstimatorChoice::FixedShare(p) => Ok(Box::new(FixedShare::try_from(p)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorKind;

    #[test]
    fn builds_each_kind_from_defaults() {
        let md = build_estimator(EstimatorChoice::default()).unwrap();
        assert_eq!(md.kind(), EstimatorKind::MeanDeviation);
        assert_eq!(md.initial_estimate(), Time::from_seconds(1.0));

        let fs = build_estimator(EstimatorChoice::FixedShare(FixedShareParams::default())).unwrap();
        assert_eq!(fs.kind(), EstimatorKind::FixedShare);
        assert_eq!(fs.estimate(), Time::from_seconds(1.0));
    }

    #[test]
    fn params_reach_the_estimator() {
        let fs = FixedShare::try_from(FixedShareParams {
            initial_estimate: 0.3,
            num_experts: 12,
            alpha: 0.5,
            beta: 0.125,
            learning_rate: 4.0,
        })
        .unwrap();
        assert_eq!(fs.num_experts(), 12);
        assert_eq!(fs.alpha(), 0.5);
        assert_eq!(fs.beta(), 0.125);
        assert_eq!(fs.learning_rate(), 4.0);
        assert_eq!(fs.initial_estimate(), Time::from_millis(300));
    }

    #[test]
    fn invalid_params_are_rejected_not_clamped() {
        let bad_gain = EstimatorChoice::MeanDeviation(MeanDeviationParams {
            alpha: 1.01,
            ..MeanDeviationParams::default()
        });
        assert!(matches!(
            build_estimator(bad_gain),
            Err(EstimatorError::InvalidConfiguration { parameter: "alpha", .. })
        ));

        let no_experts = EstimatorChoice::FixedShare(FixedShareParams {
            num_experts: 0,
            ..FixedShareParams::default()
        });
        assert!(matches!(
            build_estimator(no_experts),
            Err(EstimatorError::InvalidConfiguration { parameter: "num_experts", .. })
        ));

        let not_finite = MeanDeviationParams {
            initial_estimate: f64::INFINITY,
            ..MeanDeviationParams::default()
        };
        assert!(MeanDeviation::try_from(not_finite).is_err());
    }

    #[test]
    fn json_configuration_end_to_end() {
        let choice = EstimatorChoice::from_json_str(
            r#"{"type":"mean-deviation","params":{"initial_estimate":0.5,"alpha":0.1}}"#,
        )
        .unwrap();
        let mut est = build_estimator(choice).unwrap();
        assert_eq!(est.estimate(), Time::from_millis(500));
        est.measurement(Time::from_millis(100)).unwrap();
        est.measurement(Time::from_millis(200)).unwrap();
        // floating point path: 100 + 0.1 * 100
        assert_eq!(est.estimate(), Time::from_millis(110));
    }
}
