use anyhow::{Context, Result};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_initial_estimate() -> f64 {
    1.0
}
fn default_md_alpha() -> f64 {
    0.125
}
fn default_md_beta() -> f64 {
    0.25
}
fn default_num_experts() -> usize {
    100
}
fn default_fs_alpha() -> f64 {
    0.08
}
fn default_fs_beta() -> f64 {
    0.25
}
fn default_learning_rate() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MeanDeviationParams {
    #[serde(default = "default_initial_estimate")]
    #[schemars(
        title = "Initial estimate",
        description = "RTT estimate before any sample, in seconds.",
        range(min = 0.0),
        default = "default_initial_estimate"
    )]
    pub initial_estimate: f64,

    #[serde(default = "default_md_alpha")]
    #[schemars(
        title = "Alpha",
        description = "Gain used in estimating the RTT (0–1).",
        range(min = 0.0, max = 1.0),
        default = "default_md_alpha"
    )]
    pub alpha: f64,

    #[serde(default = "default_md_beta")]
    #[schemars(
        title = "Beta",
        description = "Gain used in estimating the RTT variation (0–1).",
        range(min = 0.0, max = 1.0),
        default = "default_md_beta"
    )]
    pub beta: f64,
}
impl Default for MeanDeviationParams {
    fn default() -> Self {
        Self {
            initial_estimate: default_initial_estimate(),
            alpha: default_md_alpha(),
            beta: default_md_beta(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct FixedShareParams {
    #[serde(default = "default_initial_estimate")]
    #[schemars(
        title = "Initial estimate",
        description = "RTT estimate before any sample, in seconds.",
        range(min = 0.0),
        default = "default_initial_estimate"
    )]
    pub initial_estimate: f64,

    #[serde(default = "default_num_experts")]
    #[schemars(
        title = "Number of experts",
        description = "Candidate RTTs in the pool (> 0).",
        range(min = 1),
        default = "default_num_experts"
    )]
    pub num_experts: usize,

    #[serde(default = "default_fs_alpha")]
    #[schemars(
        title = "Alpha",
        description = "Weight sharing rate (0–1).",
        range(min = 0.0, max = 1.0),
        default = "default_fs_alpha"
    )]
    pub alpha: f64,

    #[serde(default = "default_fs_beta")]
    #[schemars(
        title = "Beta",
        description = "Gain used in estimating the RTT variation (0–1).",
        range(min = 0.0, max = 1.0),
        default = "default_fs_beta"
    )]
    pub beta: f64,

    #[serde(default = "default_learning_rate")]
    #[schemars(
        title = "Learning rate",
        description = "Exponential update rate for expert weights (> 0).",
        default = "default_learning_rate"
    )]
    pub learning_rate: f64,
}
impl Default for FixedShareParams {
    fn default() -> Self {
        Self {
            initial_estimate: default_initial_estimate(),
            num_experts: default_num_experts(),
            alpha: default_fs_alpha(),
            beta: default_fs_beta(),
            learning_rate: default_learning_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(EstimatorKind))]
#[strum_discriminants(derive(
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    EnumMessage,
    Hash
))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum EstimatorChoice {
    #[strum_discriminants(strum(
        message = "Mean-Deviation",
        detailed_message = "EWMA of RTT and its mean deviation (Jacobson/Karels)."
    ))]
    MeanDeviation(MeanDeviationParams),
    #[strum_discriminants(strum(
        message = "Fixed-Share",
        detailed_message = "Online learning over a fixed pool of RTT experts."
    ))]
    FixedShare(FixedShareParams),
}
impl Default for EstimatorChoice {
    fn default() -> Self {
        Self::MeanDeviation(MeanDeviationParams::default())
    }
}

impl EstimatorChoice {
    /// JSON Schema for the whole tagged enum.
    pub fn schema() -> Schema {
        schema_for!(EstimatorChoice)
    }

    pub fn kind(&self) -> EstimatorKind {
        self.into()
    }

    /// Default `params` JSON for a given kind.
    pub fn default_params(kind: EstimatorKind) -> Value {
        let params = match kind {
            EstimatorKind::MeanDeviation => serde_json::to_value(MeanDeviationParams::default()),
            EstimatorKind::FixedShare => serde_json::to_value(FixedShareParams::default()),
        };
        params.unwrap_or(Value::Null)
    }

    /// Build the typed enum from kind + params.
    pub fn from_parts(kind: EstimatorKind, params: Value) -> Result<Self> {
        let key: &'static str = kind.into();
        let v = json!({ "type": key, "params": params });
        serde_json::from_value(v).with_context(|| format!("invalid params for `{key}`"))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("failed to parse estimator configuration")
    }
}
