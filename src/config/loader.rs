// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{PipelineConfig, RawPipelineConfig};
use crate::errors::Result;

/// Read and deserialise a pipeline file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(path = ?path, "read pipeline file");
    Ok(toml::from_str(&contents)?)
}

/// Parse and fully validate a pipeline definition held in memory.
///
/// Besides the structural checks in `validate`, this builds the pipeline
/// once and resolves its order, so unknown `after` references and cycles
/// are reported here rather than at run time.
pub fn load_from_str(contents: &str) -> Result<PipelineConfig> {
    let raw: RawPipelineConfig = toml::from_str(contents)?;
    let config = PipelineConfig::try_from(raw)?;
    config.build_executor()?.execution_order()?;
    Ok(config)
}

/// Recommended entry point: read, parse, and validate a pipeline file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    debug!(path = ?path, "read pipeline file");
    load_from_str(&contents)
}
