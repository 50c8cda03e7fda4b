// src/pipeline/builder.rs

use std::collections::HashMap;

use tracing::debug;

use crate::dag::{DagExecutor, NodeExecutor, WorkNode};
use crate::errors::{DagError, Result};
use crate::pipeline::stage::StageName;

/// Build a [`DagExecutor`] wired with the standard pipeline topology.
///
/// Every [`StageName`] needs an executor; a missing one is a
/// `DagError::Validation` naming the stage.
pub fn build_standard_pipeline<T: Send + 'static>(
    mut executors: HashMap<StageName, NodeExecutor<T>>,
) -> Result<DagExecutor<T>> {
    let mut dag = DagExecutor::new();

    for stage in StageName::ALL {
        let executor = executors.remove(&stage).ok_or_else(|| {
            DagError::Validation(format!("no executor provided for stage \"{stage}\""))
        })?;

        let node = WorkNode::new(stage.as_str(), executor)
            .with_dependencies(stage.dependencies().iter().map(|dep| dep.as_str()));
        dag.add_node(node)?;
    }

    debug!(nodes = dag.node_count(), "standard pipeline wired");
    Ok(dag)
}
