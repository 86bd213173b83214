/// Online scalar accumulator (e.g., streaming mean of absolute errors).
///
/// Implementations accept values incrementally via [`add`] and expose the
/// current value via [`value`].
pub trait Accumulator {
    /// Incorporates a new observation.
    fn add(&mut self, v: f64);

    /// Incorporates an observation carrying `weight` units of evidence.
    fn add_weighted(&mut self, v: f64, weight: f64);

    /// Returns the current value, `NaN` when nothing was added.
    fn value(&self) -> f64;

    /// Total weight seen so far.
    fn weight(&self) -> f64;
}
