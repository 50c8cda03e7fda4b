//! Fake stage executors that record when they were invoked.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stagedag::dag::{node_executor, NodeExecutor};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Invocation {
    pub stage: String,
    pub started: Instant,
    pub finished: Option<Instant>,
}

/// Shared log of stage invocations.
///
/// Executors created from the same recorder append to one log, so tests can
/// assert on call counts, start order and overlap between stages.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<Invocation>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that sleeps for `delay` and then returns `"<stage>-done"`.
    pub fn succeeding(&self, stage: &str, delay: Duration) -> NodeExecutor<String> {
        let value = format!("{stage}-done");
        self.executor(stage, delay, Ok(value))
    }

    /// Executor that sleeps for `delay` and then fails with `message`.
    pub fn failing(&self, stage: &str, delay: Duration, message: &str) -> NodeExecutor<String> {
        self.executor(stage, delay, Err(message.to_string()))
    }

    /// Executor that panics after recording its start.
    pub fn panicking(&self, stage: &str) -> NodeExecutor<String> {
        let log = Arc::clone(&self.log);
        let stage = stage.to_string();
        node_executor(move || {
            let log = Arc::clone(&log);
            let stage = stage.clone();
            async move {
                log.lock().unwrap().push(Invocation {
                    stage: stage.clone(),
                    started: Instant::now(),
                    finished: None,
                });
                panic!("stage {stage} exploded");
            }
        })
    }

    fn executor(
        &self,
        stage: &str,
        delay: Duration,
        outcome: Result<String, String>,
    ) -> NodeExecutor<String> {
        let log = Arc::clone(&self.log);
        let stage = stage.to_string();

        node_executor(move || {
            let log = Arc::clone(&log);
            let stage = stage.clone();
            let outcome = outcome.clone();
            async move {
                let index = {
                    let mut guard = log.lock().unwrap();
                    guard.push(Invocation {
                        stage: stage.clone(),
                        started: Instant::now(),
                        finished: None,
                    });
                    guard.len() - 1
                };

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                log.lock().unwrap()[index].finished = Some(Instant::now());
                outcome.map_err(anyhow::Error::msg)
            }
        })
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.lock().unwrap().clone()
    }

    /// Stage names in the order they started.
    pub fn start_order(&self) -> Vec<String> {
        self.invocations().into_iter().map(|i| i.stage).collect()
    }

    pub fn calls(&self, stage: &str) -> usize {
        self.invocations().iter().filter(|i| i.stage == stage).count()
    }

    pub fn started(&self, stage: &str) -> Instant {
        self.invocations()
            .into_iter()
            .find(|i| i.stage == stage)
            .map(|i| i.started)
            .unwrap_or_else(|| panic!("stage {stage} never started"))
    }

    pub fn finished(&self, stage: &str) -> Instant {
        self.invocations()
            .into_iter()
            .find(|i| i.stage == stage)
            .and_then(|i| i.finished)
            .unwrap_or_else(|| panic!("stage {stage} never finished"))
    }
}

/// Absolute distance between two instants.
pub fn gap(a: Instant, b: Instant) -> Duration {
    if a > b { a - b } else { b - a }
}
