// src/dag/report.rs

//! Terminal summary of one [`DagExecutor::execute`](crate::dag::DagExecutor::execute) call.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A stage whose executor returned an error (or panicked).
#[derive(Debug)]
pub struct ExecutionError {
    pub stage: String,
    pub error: anyhow::Error,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage '{}' failed: {:#}", self.stage, self.error)
    }
}

impl std::error::Error for ExecutionError {}

/// Outcome of a run.
///
/// `results` only holds stages that ran to success. A stage missing from
/// `results` either failed (and is listed in `errors`) or never ran because
/// an upstream stage failed; see [`unreached`](Self::unreached).
///
/// `execution_order` is the resolver's topological order, not a timeline:
/// stages in the same level run concurrently.
#[derive(Debug)]
pub struct ExecutionReport<T> {
    /// `true` iff no stage failed and every registered stage completed.
    pub success: bool,
    pub results: HashMap<String, T>,
    pub execution_order: Vec<String>,
    /// One entry per failed stage, in the order the failures were observed.
    pub errors: Vec<ExecutionError>,
}

impl<T> ExecutionReport<T> {
    pub(crate) fn aggregate(
        total_nodes: usize,
        completed: &HashSet<String>,
        results: HashMap<String, T>,
        execution_order: Vec<String>,
        errors: Vec<ExecutionError>,
    ) -> Self {
        let success = errors.is_empty() && completed.len() == total_nodes;
        Self {
            success,
            results,
            execution_order,
            errors,
        }
    }

    pub fn result(&self, stage: &str) -> Option<&T> {
        self.results.get(stage)
    }

    pub fn failed_stages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.stage.as_str()).collect()
    }

    /// Stages that neither completed nor failed: they were never started
    /// because something upstream failed.
    pub fn unreached(&self) -> Vec<&str> {
        let failed: HashSet<&str> = self.failed_stages().into_iter().collect();
        self.execution_order
            .iter()
            .map(String::as_str)
            .filter(|name| !self.results.contains_key(*name) && !failed.contains(name))
            .collect()
    }
}
