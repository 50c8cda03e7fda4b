// src/config/validate.rs

use crate::config::model::{PipelineConfig, RawPipelineConfig};
use crate::errors::{DagError, Result};
use crate::pipeline::StageName;

impl TryFrom<RawPipelineConfig> for PipelineConfig {
    type Error = DagError;

    fn try_from(raw: RawPipelineConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(PipelineConfig::new_unchecked(raw.config, raw.stage))
    }
}

/// Checks that do not need the graph itself. Unknown dependencies and cycles
/// are reported by the resolver once the pipeline is built.
fn validate_raw_config(cfg: &RawPipelineConfig) -> Result<()> {
    ensure_has_stages(cfg)?;
    validate_stages(cfg)?;
    if cfg.config.standard_topology {
        validate_standard_topology(cfg)?;
    }
    Ok(())
}

fn ensure_has_stages(cfg: &RawPipelineConfig) -> Result<()> {
    if cfg.stage.is_empty() {
        return Err(DagError::ConfigError(
            "pipeline must contain at least one [stage.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_stages(cfg: &RawPipelineConfig) -> Result<()> {
    for (name, stage) in cfg.stage.iter() {
        if name.trim().is_empty() {
            return Err(DagError::ConfigError(
                "stage names must not be empty".to_string(),
            ));
        }
        if stage.cmd.trim().is_empty() {
            return Err(DagError::ConfigError(format!(
                "stage '{name}' has an empty `cmd`"
            )));
        }
        if stage.timeout_secs == Some(0) {
            return Err(DagError::ConfigError(format!(
                "stage '{name}': `timeout_secs` must be >= 1 (got 0)"
            )));
        }
    }
    Ok(())
}

fn validate_standard_topology(cfg: &RawPipelineConfig) -> Result<()> {
    for (name, stage) in cfg.stage.iter() {
        let parsed = name.parse::<StageName>().map_err(DagError::ConfigError)?;
        // Keys are matched exactly; `[stage.Planning]` next to `[stage.planning]`
        // would otherwise collapse into one stage.
        if name != parsed.as_str() {
            return Err(DagError::ConfigError(format!(
                "stage '{name}' must be written as [stage.{parsed}] when [config].standard_topology = true"
            )));
        }

        if !stage.after.is_empty() {
            return Err(DagError::ConfigError(format!(
                "stage '{name}' declares `after` but [config].standard_topology = true wires dependencies itself"
            )));
        }
    }

    for stage in StageName::ALL {
        if !cfg.stage.contains_key(stage.as_str()) {
            return Err(DagError::ConfigError(format!(
                "standard topology requires a [stage.{stage}] section"
            )));
        }
    }

    Ok(())
}
