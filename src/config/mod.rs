// src/config/mod.rs

//! Pipeline definitions read from TOML.
//!
//! - [`model`] is the serde-backed data model.
//! - [`validate`] turns a raw file into a checked [`PipelineConfig`].
//! - [`loader`] reads a file from disk.
//! - [`build`] turns a checked config into a runnable `DagExecutor`.

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigSection, PipelineConfig, RawPipelineConfig, StageConfig};
