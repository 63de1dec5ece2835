//! Fargate Runner
//!
//! The task lifecycle controller: launches exactly one task, waits for it to
//! stop and classifies how its containers exited.
//!
//! Architecture:
//! - Launcher: submits the run request and validates the response shape
//! - Exit waiter: checks the handle, blocks on the client's wait primitive,
//!   then describes the task once and classifies its containers
//! - Outcome: folds both phases into a closed set of results for callers
//!
//! The runner never retries. Transport errors, launch failures and wait
//! failures are all returned to the caller, who decides how to report them.

mod config;
mod error;
mod exit;
mod launch;
mod outcome;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, RunnerConfig};
pub use error::{HandleField, LaunchError, WaitError};
pub use exit::{ExitReport, TaskRef};
pub use outcome::RunOutcome;

use fargate_client::ClusterApi;
use std::sync::Arc;

/// Launches and supervises a single Fargate task per invocation
///
/// Holds no per-task state; one runner can serve concurrent invocations, each
/// with its own handle.
#[derive(Clone)]
pub struct TaskRunner {
    client: Arc<dyn ClusterApi>,
    config: RunnerConfig,
}

impl TaskRunner {
    /// Creates a runner over any cluster API implementation
    pub fn new(client: Arc<dyn ClusterApi>, config: RunnerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
