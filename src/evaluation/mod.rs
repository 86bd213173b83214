mod accumulators;
mod diagnostics;
mod error_report;
mod measurement;
mod preview;

pub use accumulators::{Accumulator, MeanAccumulator};
pub use diagnostics::{DiagnosticEntry, Diagnostics, DiagnosticsSummary, MaxActual};
pub use error_report::ErrorReport;
pub use measurement::Measurement;
pub use preview::{EstimateCurve, Snapshot};
