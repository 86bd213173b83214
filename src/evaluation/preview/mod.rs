mod estimate_curve;
mod snapshot;

pub use estimate_curve::EstimateCurve;
pub use snapshot::Snapshot;
