// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pipeline;

use anyhow::{bail, Context, Result};
use petgraph::dot::{Config as DotConfig, Dot};
use tracing::{debug, error, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, PipelineConfig};
use crate::dag::{DagExecutor, ExecutionReport};
use crate::exec::CommandOutput;

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the pipeline file, then either prints it
/// (`--dry-run`) or runs it until completion or Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading pipeline from {:?}", args.config))?;
    let dag = cfg.build_executor()?;

    if args.dry_run {
        return print_dry_run(&cfg, &dag);
    }

    // Dropping the run on Ctrl-C drops the in-flight level's JoinSet, which
    // aborts its tasks; stage processes are `kill_on_drop`.
    let report = tokio::select! {
        report = dag.execute() => report?,
        _ = shutdown_signal() => {
            warn!("Ctrl-C received; aborting pipeline run");
            bail!("pipeline run interrupted");
        }
    };

    print_summary(&report);

    if !report.success {
        bail!(
            "pipeline did not complete: {} stage(s) failed, {} stage(s) not run",
            report.errors.len(),
            report.unreached().len()
        );
    }

    info!("pipeline completed successfully");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn print_dry_run(cfg: &PipelineConfig, dag: &DagExecutor<CommandOutput>) -> Result<()> {
    let order = dag.execution_order()?;

    println!("stagedag dry-run");
    println!(
        "  config.standard_topology = {}",
        cfg.config.standard_topology
    );
    println!();

    println!("stages ({}):", dag.node_count());
    for name in &order {
        let Some(stage) = cfg.stage.get(name) else {
            continue;
        };
        println!("  - {name}");
        println!("      cmd: {}", stage.cmd);
        if let Some(node) = dag.get_node(name) {
            if !node.dependencies.is_empty() {
                println!("      after: {:?}", node.dependencies);
            }
        }
        if let Some(secs) = stage.timeout_secs {
            println!("      timeout_secs: {secs}");
        }
    }
    println!();

    println!("execution order: {}", order.join(" -> "));
    println!();

    let graph = dag.dependency_graph();
    println!("{:?}", Dot::with_config(&graph, &[DotConfig::EdgeNoLabel]));

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn print_summary(report: &ExecutionReport<CommandOutput>) {
    let unreached = report.unreached();

    println!("stagedag summary");
    for name in &report.execution_order {
        if let Some(output) = report.result(name) {
            println!("  [ok]      {name}");
            for line in output.stdout.lines() {
                println!("              {line}");
            }
        } else if let Some(err) = report.errors.iter().find(|e| &e.stage == name) {
            println!("  [failed]  {name}: {:#}", err.error);
        } else if unreached.contains(&name.as_str()) {
            println!("  [skipped] {name} (upstream failure)");
        }
    }
}
