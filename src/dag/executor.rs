// src/dag/executor.rs

//! Public facade: build a graph of nodes, then run it.

use petgraph::graphmap::DiGraphMap;
use tracing::{debug, error, info};

use crate::dag::node::WorkNode;
use crate::dag::registry::NodeRegistry;
use crate::dag::report::ExecutionReport;
use crate::dag::resolver::topological_order;
use crate::dag::scheduler::LevelScheduler;
use crate::dag::NodeName;
use crate::errors::Result;

/// Dependency-graph task scheduler.
///
/// Nodes are added with [`add_node`](Self::add_node); [`execute`](Self::execute)
/// validates the graph, then runs independent nodes concurrently, level by
/// level. A failing node only prevents its own (transitive) dependents from
/// running.
///
/// ```no_run
/// # async fn demo() -> stagedag::errors::Result<()> {
/// use stagedag::dag::{node_executor, DagExecutor, WorkNode};
///
/// let mut dag = DagExecutor::new();
/// dag.add_node(WorkNode::new("fetch", node_executor(|| async { Ok(1) })))?;
/// dag.add_node(WorkNode::new("parse", node_executor(|| async { Ok(2) })).after("fetch"))?;
///
/// let report = dag.execute().await?;
/// assert!(report.success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DagExecutor<T> {
    registry: NodeRegistry<T>,
}

impl<T: Send + 'static> DagExecutor<T> {
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::new(),
        }
    }

    /// Register a node. Fails with `DagError::Validation` for an empty name.
    ///
    /// Registering an existing name replaces that node.
    pub fn add_node(&mut self, node: WorkNode<T>) -> Result<()> {
        self.registry.insert(node)
    }

    pub fn get_node(&self, name: &str) -> Option<&WorkNode<T>> {
        self.registry.get(name)
    }

    /// Node names in registration order.
    pub fn node_names(&self) -> Vec<NodeName> {
        self.registry.names().to_vec()
    }

    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    pub fn clear(&mut self) {
        debug!(nodes = self.registry.len(), "clearing dag");
        self.registry.clear();
    }

    /// Validate the graph and return the order `execute` would report,
    /// without running anything.
    pub fn execution_order(&self) -> Result<Vec<NodeName>> {
        topological_order(&self.registry)
    }

    /// Graph view with edges pointing from each dependency to its dependent.
    ///
    /// Dependencies that are not registered are left out.
    pub fn dependency_graph(&self) -> DiGraphMap<&str, ()> {
        let mut graph = DiGraphMap::new();

        for node in self.registry.iter() {
            graph.add_node(node.name.as_str());
        }

        for node in self.registry.iter() {
            for dep in node.dependencies.iter().filter(|d| self.registry.contains(d)) {
                graph.add_edge(dep.as_str(), node.name.as_str(), ());
            }
        }

        graph
    }

    /// Run every node.
    ///
    /// Returns `Err` only for structural problems (unknown dependency,
    /// cycle), in which case no executor has been invoked. Executor failures
    /// are reported inside the returned [`ExecutionReport`].
    pub async fn execute(&self) -> Result<ExecutionReport<T>> {
        let total = self.registry.len();
        info!(nodes = total, "dag: starting execution");

        let order = topological_order(&self.registry).inspect_err(|err| {
            error!(error = %err, "dag: graph is invalid; no stage was run");
        })?;

        let outcome = LevelScheduler::new(&self.registry, &order).run().await;

        let report = ExecutionReport::aggregate(
            total,
            &outcome.completed,
            outcome.results,
            order,
            outcome.errors,
        );

        info!(
            success = report.success,
            completed = outcome.completed.len(),
            failed = report.errors.len(),
            blocked = outcome.blocked.len(),
            "dag: execution finished"
        );

        Ok(report)
    }
}

impl<T: Send + 'static> Default for DagExecutor<T> {
    fn default() -> Self {
        Self::new()
    }
}
