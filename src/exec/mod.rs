// src/exec/mod.rs

//! Shell-command stage executors.
//!
//! The scheduler treats executors as opaque; this module provides the
//! concrete kind the `stagedag` binary uses: run a command through the
//! platform shell and succeed iff it exits with status 0. Per-stage
//! timeouts live here, inside the executor, not in the scheduler.

pub mod command;

pub use command::{command_executor, run_command, CommandOutput};
