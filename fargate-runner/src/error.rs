//! Error types of the lifecycle controller
//!
//! Each phase has its own error enum so callers can branch on the variant
//! instead of matching messages.

use fargate_client::{ClientError, WaiterState};
use fargate_core::domain::failure::{Failure, serialize_failures};
use std::fmt;
use thiserror::Error;

/// Errors raised while launching a task
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The run response reported per-resource failures
    #[error(
        "expected response to contain 0 failures, found {}: {}",
        .failures.len(),
        serialize_failures(.failures)
    )]
    Failures { failures: Vec<Failure> },

    /// The run response did not contain exactly one task
    #[error("expected response to contain {expected} task, found {actual}")]
    TaskCount { expected: usize, actual: usize },

    /// The API call itself failed
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Handle field the exit waiter could not find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleField {
    TaskArn,
    ClusterArn,
}

impl fmt::Display for HandleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleField::TaskArn => write!(f, "taskArn"),
            HandleField::ClusterArn => write!(f, "clusterArn"),
        }
    }
}

/// Errors raised while waiting for a task to exit
#[derive(Debug, Error)]
pub enum WaitError {
    /// The handle lacks a field needed to address the task
    #[error("invalid task handle: missing {0}")]
    InvalidHandle(HandleField),

    /// The wait primitive ended in a state other than success
    #[error("wait for task ended in state {state}: {}", .reason.as_deref().unwrap_or("no reason given"))]
    WaitFailed {
        state: WaiterState,
        reason: Option<String>,
    },

    /// The final describe call reported per-resource failures
    #[error("failed to describe stopped task: {}", serialize_failures(.failures))]
    DescribeFailed { failures: Vec<Failure> },

    /// The describe call itself failed
    #[error(transparent)]
    Api(#[from] ClientError),
}

impl WaitError {
    /// True when the wait budget ran out before the task stopped
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            WaitError::WaitFailed {
                state: WaiterState::Timeout,
                ..
            }
        )
    }
}
