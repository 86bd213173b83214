use crate::evaluation::accumulators::Accumulator;

/// Streaming weighted mean: `mean = sum / weight`.
///
/// `NaN` observations and non-positive weights are ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MeanAccumulator {
    weight: f64,
    sum: f64,
}

impl Accumulator for MeanAccumulator {
    #[inline]
    fn add(&mut self, v: f64) {
        self.add_weighted(v, 1.0);
    }

    #[inline]
    fn add_weighted(&mut self, v: f64, weight: f64) {
        if v.is_nan() || weight.is_nan() || weight <= 0.0 {
            return;
        }
        self.weight += weight;
        self.sum += v * weight;
    }

    #[inline]
    fn value(&self) -> f64 {
        if self.weight > 0.0 {
            self.sum / self.weight
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn weight(&self) -> f64 {
        self.weight
    }
}
