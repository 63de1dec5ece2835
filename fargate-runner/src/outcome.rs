//! Run outcome
//!
//! Launch and wait folded into one closed set of results, so callers branch
//! on a variant rather than on error messages.

use fargate_core::domain::failure::Failure;
use fargate_core::domain::outcome::ExitOutcome;
use fargate_core::domain::request::RunRequest;
use fargate_core::domain::task::{Task, TaskHandle};

use crate::TaskRunner;
use crate::error::{LaunchError, WaitError};
use crate::exit::ExitReport;

/// Result of a full launch (and optional wait) cycle
#[derive(Debug)]
pub enum RunOutcome {
    /// Task started; waiting was not requested
    Launched(TaskHandle),
    /// No task was started
    LaunchFailed(LaunchError),
    /// The task did not stop within the wait budget
    WaitTimedOut {
        handle: TaskHandle,
        reason: Option<String>,
    },
    /// Waiting failed for any other reason (bad handle, API error, failed waiter)
    WaitFailed { handle: TaskHandle, error: WaitError },
    /// The task stopped but its final state could not be fetched
    DescribeFailed {
        handle: TaskHandle,
        failures: Vec<Failure>,
    },
    /// The task stopped and its containers were classified
    Exited {
        handle: TaskHandle,
        /// Final described state of the task
        stopped: Option<Task>,
        outcome: ExitOutcome,
    },
}

impl RunOutcome {
    /// Folds the result of the wait phase
    pub fn from_wait(handle: TaskHandle, result: Result<ExitReport, WaitError>) -> Self {
        match result {
            Ok(ExitReport { task, outcome }) => RunOutcome::Exited {
                handle,
                stopped: task,
                outcome,
            },
            Err(WaitError::DescribeFailed { failures }) => {
                RunOutcome::DescribeFailed { handle, failures }
            }
            Err(error) if error.is_timeout() => {
                let reason = match error {
                    WaitError::WaitFailed { reason, .. } => reason,
                    _ => None,
                };
                RunOutcome::WaitTimedOut { handle, reason }
            }
            Err(error) => RunOutcome::WaitFailed { handle, error },
        }
    }

    /// The launched task, if any
    pub fn handle(&self) -> Option<&TaskHandle> {
        match self {
            RunOutcome::LaunchFailed(_) => None,
            RunOutcome::Launched(handle)
            | RunOutcome::WaitTimedOut { handle, .. }
            | RunOutcome::WaitFailed { handle, .. }
            | RunOutcome::DescribeFailed { handle, .. }
            | RunOutcome::Exited { handle, .. } => Some(handle),
        }
    }

    /// The task as last seen: its described state once it stopped, the
    /// launched handle otherwise
    pub fn latest_task(&self) -> Option<&Task> {
        match self {
            RunOutcome::Exited {
                stopped: Some(task),
                ..
            } => Some(task),
            _ => self.handle(),
        }
    }

    pub fn task_arn(&self) -> Option<&str> {
        self.handle().and_then(|h| h.task_arn.as_deref())
    }

    /// Whether the task ran to a clean exit
    ///
    /// `None` when no verdict exists: launch failed or waiting was skipped.
    pub fn succeeded(&self) -> Option<bool> {
        match self {
            RunOutcome::Launched(_) | RunOutcome::LaunchFailed(_) => None,
            RunOutcome::Exited { outcome, .. } => Some(outcome.succeeded),
            _ => Some(false),
        }
    }

    /// Diagnostics to report, in order
    pub fn errors(&self) -> Vec<String> {
        match self {
            RunOutcome::Launched(_) => vec![],
            RunOutcome::LaunchFailed(error) => vec![error.to_string()],
            RunOutcome::WaitTimedOut { reason, .. } => vec![format!(
                "task did not stop in time: {}",
                reason.as_deref().unwrap_or("wait budget exhausted")
            )],
            RunOutcome::WaitFailed { error, .. } => vec![error.to_string()],
            RunOutcome::DescribeFailed { failures, .. } => {
                failures.iter().map(Failure::to_string).collect()
            }
            RunOutcome::Exited { outcome, .. } => outcome.errors.clone(),
        }
    }

    pub fn is_launch_failure(&self) -> bool {
        matches!(self, RunOutcome::LaunchFailed(_))
    }
}

impl TaskRunner {
    /// Launches a task and, when `wait` is set, waits for it to exit
    pub async fn run(&self, request: &RunRequest, wait: bool) -> RunOutcome {
        let handle = match self.launch(request).await {
            Ok(handle) => handle,
            Err(error) => return RunOutcome::LaunchFailed(error),
        };

        if !wait {
            return RunOutcome::Launched(handle);
        }

        let result = self.wait_for_report(&handle).await;
        RunOutcome::from_wait(handle, result)
    }
}
