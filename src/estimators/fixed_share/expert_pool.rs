use crate::estimators::EstimatorError;

/// Smallest candidate RTT offset, seconds.
pub const RTT_MIN: f64 = 0.0;
/// Largest candidate RTT, seconds.
pub const RTT_MAX: f64 = 0.4;

/// Fixed ladder of candidate RTTs with their learned weights.
///
/// Expert `i` (1-based) predicts `RTT_MIN + RTT_MAX * 2^((i - N) / 4)`
/// seconds, which gives finer resolution towards small RTTs.
///
/// Weights always sum to one between updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertPool {
    experts: Vec<f64>,
    weights: Vec<f64>,
    losses: Vec<f64>,
}

impl ExpertPool {
    pub fn new(num_experts: usize) -> Result<Self, EstimatorError> {
        if num_experts == 0 {
            return Err(EstimatorError::invalid("num_experts", "must be > 0"));
        }
        Ok(Self::ladder(num_experts))
    }

    fn ladder(num_experts: usize) -> Self {
        let n = num_experts as f64;
        let experts = (1..=num_experts)
            .map(|i| RTT_MIN + RTT_MAX * 2f64.powf((i as f64 - n) / 4.0))
            .collect();
        Self {
            experts,
            weights: vec![1.0 / n; num_experts],
            losses: vec![0.0; num_experts],
        }
    }

    /// Same ladder, uniform weights.
    pub(crate) fn fresh(&self) -> Self {
        Self::ladder(self.len())
    }

    pub fn len(&self) -> usize {
        self.experts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }

    pub fn experts(&self) -> &[f64] {
        &self.experts
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Losses computed by the last update.
    pub fn losses(&self) -> &[f64] {
        &self.losses
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Index of the heaviest expert (first one on ties).
    pub fn best_expert(&self) -> Option<usize> {
        let mut best = None;
        let mut best_weight = f64::NEG_INFINITY;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > best_weight {
                best = Some(i);
                best_weight = w;
            }
        }
        best
    }

    /// Weighted average of the experts, seconds.
    pub fn predict(&self) -> Result<f64, EstimatorError> {
        let (numerator, denominator) = self
            .weights
            .iter()
            .zip(&self.experts)
            .fold((0.0, 0.0), |(num, den), (w, e)| (num + w * e, den + w));
        Self::check_sum(denominator)?;
        Ok(numerator / denominator)
    }

    /// Loss of one expert against the observed RTT.
    ///
    /// Overestimates pay the squared error. Underestimates pay a flat
    /// `2 * actual`, since an RTO below the real RTT fires spuriously.
    #[inline]
    pub fn loss(expert: f64, actual: f64) -> f64 {
        if expert >= actual {
            (expert - actual).powi(2)
        } else {
            2.0 * actual
        }
    }

    /// Exponential weight update followed by the fixed-share mixing step,
    /// then rescaled to sum to one.
    ///
    /// Losses are taken relative to the smallest one, so the best expert
    /// keeps its weight and no sample can drive every weight to zero.
    /// Losses and weights are only replaced when the resulting sum is
    /// positive and finite.
    pub fn update(
        &mut self,
        actual: f64,
        learning_rate: f64,
        alpha: f64,
    ) -> Result<(), EstimatorError> {
        let losses: Vec<f64> = self
            .experts
            .iter()
            .map(|&expert| Self::loss(expert, actual))
            .collect();
        let min_loss = losses.iter().copied().fold(f64::INFINITY, f64::min);

        let mut next: Vec<f64> = self
            .weights
            .iter()
            .zip(&losses)
            .map(|(w, loss)| w * (-learning_rate * (loss - min_loss)).exp())
            .collect();

        let pool = alpha * next.iter().sum::<f64>() / next.len() as f64;
        for w in next.iter_mut() {
            *w = (1.0 - alpha) * *w + pool;
        }

        let sum: f64 = next.iter().sum();
        Self::check_sum(sum)?;
        for w in next.iter_mut() {
            *w /= sum;
        }

        self.weights = next;
        self.losses = losses;
        Ok(())
    }

    fn check_sum(sum: f64) -> Result<(), EstimatorError> {
        if sum > 0.0 && sum.is_finite() {
            Ok(())
        } else {
            Err(EstimatorError::DegenerateWeightSum(sum))
        }
    }

    #[cfg(test)]
    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }
}
