// src/dag/scheduler.rs

//! Level-synchronised execution of a resolved graph.
//!
//! Each iteration picks every remaining node whose dependencies have all
//! completed successfully, runs that whole level concurrently on a
//! [`JoinSet`], waits for all of it, and folds the outcomes back in. A
//! failed node is never added to `completed`, so its dependents never
//! become eligible. The loop stops when nothing remains or nothing is
//! eligible.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::{Id, JoinSet};
use tracing::{debug, error, info, warn};

use crate::dag::registry::NodeRegistry;
use crate::dag::report::ExecutionError;
use crate::dag::NodeName;

/// Label for a task failure that cannot be traced back to a stage.
const UNKNOWN_STAGE: &str = "<unknown stage>";

/// Per-run bookkeeping. Owned exclusively by one `execute()` call and only
/// touched between levels, or while draining the current level's `JoinSet`.
pub struct LevelScheduler<'a, T> {
    registry: &'a NodeRegistry<T>,
    remaining: Vec<NodeName>,
    completed: HashSet<NodeName>,
    results: HashMap<NodeName, T>,
    errors: Vec<ExecutionError>,
    level_index: usize,
}

/// What a finished run hands to the report aggregator.
#[derive(Debug)]
pub struct LevelOutcome<T> {
    pub completed: HashSet<NodeName>,
    pub results: HashMap<NodeName, T>,
    pub errors: Vec<ExecutionError>,
    /// Nodes that were still waiting when no further progress was possible.
    pub blocked: Vec<NodeName>,
}

impl<'a, T: Send + 'static> LevelScheduler<'a, T> {
    /// `order` must be a topological order over every node in `registry`.
    pub fn new(registry: &'a NodeRegistry<T>, order: &[NodeName]) -> Self {
        Self {
            registry,
            remaining: order.to_vec(),
            completed: HashSet::new(),
            results: HashMap::new(),
            errors: Vec::new(),
            level_index: 0,
        }
    }

    pub async fn run(mut self) -> LevelOutcome<T> {
        while !self.remaining.is_empty() {
            let level = self.next_level();

            if level.is_empty() {
                warn!(
                    blocked = ?self.remaining,
                    "no eligible stages left; remaining stages are blocked by upstream failures"
                );
                break;
            }

            self.run_level(&level).await;
            self.remaining.retain(|name| !level.contains(name));
            self.level_index += 1;
        }

        LevelOutcome {
            completed: self.completed,
            results: self.results,
            errors: self.errors,
            blocked: self.remaining,
        }
    }

    /// Remaining nodes whose dependencies have all completed.
    fn next_level(&self) -> Vec<NodeName> {
        self.remaining
            .iter()
            .filter(|name| {
                self.registry.get(name).is_some_and(|node| {
                    node.dependencies
                        .iter()
                        .all(|dep| self.completed.contains(dep))
                })
            })
            .cloned()
            .collect()
    }

    /// Dispatch every node of the level and wait for all of them.
    ///
    /// A failing (or panicking) node only records an error for itself;
    /// siblings keep running.
    async fn run_level(&mut self, level: &[NodeName]) {
        info!(level = self.level_index, stages = ?level, "dispatching level");

        let mut join_set: JoinSet<(NodeName, anyhow::Result<T>)> = JoinSet::new();
        let mut stage_by_task: HashMap<Id, NodeName> = HashMap::with_capacity(level.len());

        for name in level {
            let Some(node) = self.registry.get(name) else {
                continue;
            };

            let executor = Arc::clone(&node.executor);
            let stage = name.clone();
            let handle = join_set.spawn(async move {
                debug!(stage = %stage, "stage started");
                let outcome = executor().await;
                (stage, outcome)
            });
            stage_by_task.insert(handle.id(), name.clone());
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((stage, Ok(value))) => {
                    info!(stage = %stage, "stage completed");
                    self.completed.insert(stage.clone());
                    self.results.insert(stage, value);
                }
                Ok((stage, Err(err))) => {
                    warn!(
                        stage = %stage,
                        error = %format!("{err:#}"),
                        "stage failed; its dependents will not run"
                    );
                    self.errors.push(ExecutionError { stage, error: err });
                }
                Err(join_err) => {
                    // Every task spawned above was recorded with its id.
                    let stage = stage_by_task.remove(&join_err.id());
                    debug_assert!(stage.is_some(), "join error for an unrecorded task");
                    let stage = stage.unwrap_or_else(|| UNKNOWN_STAGE.to_string());
                    error!(stage = %stage, error = %join_err, "stage task aborted or panicked");
                    self.errors.push(ExecutionError {
                        stage,
                        error: anyhow!("stage task did not finish: {join_err}"),
                    });
                }
            }
        }
    }
}
