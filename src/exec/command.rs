// src/exec/command.rs

//! Shell-command stages.
//!
//! On Unix each stage runs in its own process group. If the stage is
//! abandoned before its shell exits (timeout, or the run being aborted),
//! the whole group is killed, so children of the shell go with it.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::dag::{node_executor, NodeExecutor};

/// Captured result of a stage process that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Executor that runs `cmd` in a shell each time the stage is invoked.
pub fn command_executor(
    stage: impl Into<String>,
    cmd: impl Into<String>,
    timeout: Option<Duration>,
) -> NodeExecutor<CommandOutput> {
    let stage = stage.into();
    let cmd = cmd.into();

    node_executor(move || {
        let stage = stage.clone();
        let cmd = cmd.clone();
        async move { run_command(&stage, &cmd, timeout).await }
    })
}

/// Run one stage process to completion.
///
/// The process group is killed when the timeout elapses or when the
/// surrounding task is aborted.
pub async fn run_command(
    stage: &str,
    cmd: &str,
    timeout: Option<Duration>,
) -> Result<CommandOutput> {
    info!(stage, cmd, "starting stage process");

    let mut command = shell_command(cmd);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    {
        command.process_group(0);
    }

    let child = command
        .spawn()
        .with_context(|| format!("spawning process for stage '{stage}'"))?;
    let mut group = ProcessGroupGuard::new(stage, child.id());

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("stage '{stage}' timed out after {limit:?}"))?,
        None => child.wait_with_output().await,
    };
    group.disarm();
    let output = waited.with_context(|| format!("waiting for process of stage '{stage}'"))?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stderr.lines() {
        debug!(stage, "stderr: {}", line);
    }

    info!(
        stage,
        exit_code,
        success = output.status.success(),
        "stage process exited"
    );

    if !output.status.success() {
        bail!("stage '{stage}' exited with code {exit_code}");
    }

    Ok(CommandOutput {
        exit_code,
        stdout,
        stderr,
    })
}

/// Kills the stage's process group on drop unless disarmed first.
struct ProcessGroupGuard<'a> {
    stage: &'a str,
    pgid: Option<i32>,
}

impl<'a> ProcessGroupGuard<'a> {
    fn new(stage: &'a str, pid: Option<u32>) -> Self {
        Self {
            stage,
            pgid: pid.and_then(|pid| i32::try_from(pid).ok()),
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard<'_> {
    fn drop(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            debug!(stage = self.stage, pgid, "killing abandoned stage process group");
            kill_process_group(pgid);
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: i32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // ESRCH just means the group is already gone.
    if let Err(err) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!(pgid, error = %err, "killpg failed");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pgid: i32) {}

fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}
