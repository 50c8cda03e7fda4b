// src/dag/mod.rs

//! Dependency-graph execution.
//!
//! - [`node`] defines a schedulable unit of work and its executor type.
//! - [`registry`] stores nodes by name and rejects malformed definitions.
//! - [`resolver`] computes a topological order (Kahn's algorithm) and
//!   reports unknown dependencies and cycles.
//! - [`scheduler`] runs nodes level by level, concurrently within a level.
//! - [`report`] holds the terminal [`ExecutionReport`] of a run.
//! - [`executor`] is the public facade tying the pieces together.

/// Canonical node name type used throughout the scheduler.
pub type NodeName = String;

pub mod executor;
pub mod node;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod scheduler;

pub use executor::DagExecutor;
pub use node::{node_executor, NodeExecutor, NodeFuture, WorkNode};
pub use registry::NodeRegistry;
pub use report::{ExecutionError, ExecutionReport};
pub use resolver::topological_order;
