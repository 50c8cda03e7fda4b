// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Pipeline file exactly as deserialised, before validation.
///
/// ```toml
/// [config]
/// standard_topology = false
///
/// [stage.fetch]
/// cmd = "curl -fsS https://example.com -o page.html"
/// timeout_secs = 30
///
/// [stage.parse]
/// cmd = "python parse.py page.html"
/// after = ["fetch"]
/// ```
///
/// Stages are keyed by name; they are registered in name order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPipelineConfig {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub stage: BTreeMap<String, StageConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Wire stages with the standard six-stage topology instead of their
    /// `after` lists. Requires exactly the standard stage names.
    #[serde(default)]
    pub standard_topology: bool,
}

/// `[stage.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    /// Shell command to run.
    pub cmd: String,

    /// Stages that must succeed before this one runs.
    #[serde(default)]
    pub after: Vec<String>,

    /// Kill the stage and count it as failed after this many seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl StageConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// A pipeline definition that passed [`validate`](crate::config::validate).
///
/// Only obtainable through `TryFrom<RawPipelineConfig>`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub config: ConfigSection,
    pub stage: BTreeMap<String, StageConfig>,
}

impl PipelineConfig {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        stage: BTreeMap<String, StageConfig>,
    ) -> Self {
        Self { config, stage }
    }
}
