// src/config/build.rs

use std::collections::HashMap;

use tracing::debug;

use crate::config::model::PipelineConfig;
use crate::dag::{DagExecutor, WorkNode};
use crate::errors::{DagError, Result};
use crate::exec::{command_executor, CommandOutput};
use crate::pipeline::{build_standard_pipeline, StageName};

impl PipelineConfig {
    /// Turn the pipeline into a runnable graph of shell-command stages.
    pub fn build_executor(&self) -> Result<DagExecutor<CommandOutput>> {
        if self.config.standard_topology {
            return self.build_standard();
        }

        let mut dag = DagExecutor::new();
        for (name, stage) in self.stage.iter() {
            let executor = command_executor(name.as_str(), stage.cmd.as_str(), stage.timeout());
            dag.add_node(WorkNode::new(name.as_str(), executor).with_dependencies(&stage.after))?;
        }

        debug!(stages = dag.node_count(), "pipeline built from `after` lists");
        Ok(dag)
    }

    fn build_standard(&self) -> Result<DagExecutor<CommandOutput>> {
        let mut executors = HashMap::with_capacity(self.stage.len());
        for (name, stage) in self.stage.iter() {
            let stage_name = name.parse::<StageName>().map_err(DagError::ConfigError)?;
            executors.insert(
                stage_name,
                command_executor(name.as_str(), stage.cmd.as_str(), stage.timeout()),
            );
        }
        build_standard_pipeline(executors)
    }
}
