// src/errors.rs

//! Crate-wide error type.
//!
//! Structural problems with a graph (bad node definitions, unknown
//! dependencies, cycles) are `DagError`s and abort `execute()` before any
//! stage runs. Failures of individual stages are *not* `DagError`s; they are
//! collected into the [`ExecutionReport`](crate::dag::ExecutionReport).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DagError {
    /// Malformed node definition rejected at registration time.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Node \"{node}\" depends on non-existent node \"{dependency}\"")]
    MissingDependency { node: String, dependency: String },

    /// Nodes that could not be placed in a topological order.
    #[error("Circular dependency detected. Unprocessed nodes: {}", .0.join(", "))]
    CircularDependency(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DagError>;
