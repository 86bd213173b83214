use std::fmt::{Display, Formatter, Result};

/// Named scalar metric reported by a diagnostics summary or error report.
///
/// Typical examples: `"mean_absolute_error_ms"`, `"sample_count"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub value: f64,
}

impl Measurement {
    /// Convenience constructor
    #[inline]
    pub fn new<N: Into<String>>(name: N, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Looks up a metric by name in a list of measurements.
    pub fn find(measurements: &[Measurement], name: &str) -> Option<f64> {
        measurements.iter().find(|m| m.name == name).map(|m| m.value)
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
