//! Wait-until-stopped primitive
//!
//! Polls DescribeTasks until every task reports `STOPPED`, backing off between
//! attempts, and gives up once the wait budget is spent. The whole wait,
//! including in-flight requests, is bounded by the budget.

use fargate_core::domain::failure::serialize_failures;
use fargate_core::dto::task::DescribeTasksRequest;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::ClusterApi;

/// Polling cadence of the waiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiterConfig {
    /// Delay after the first unsuccessful check
    pub min_delay: Duration,
    /// Upper bound for the doubling delay
    pub max_delay: Duration,
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(6),
            max_delay: Duration::from_secs(120),
        }
    }
}

/// Final state of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterState {
    /// Every task reached STOPPED
    Success,
    /// The API reported failures or an unrecoverable error
    Failure,
    /// The wait budget elapsed first
    Timeout,
}

impl fmt::Display for WaiterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaiterState::Success => write!(f, "SUCCESS"),
            WaiterState::Failure => write!(f, "FAILURE"),
            WaiterState::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// Outcome of a wait, with a reason for anything but success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiterResult {
    pub state: WaiterState,
    pub reason: Option<String>,
}

impl WaiterResult {
    pub fn success() -> Self {
        Self {
            state: WaiterState::Success,
            reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            state: WaiterState::Failure,
            reason: Some(reason.into()),
        }
    }

    pub fn timeout(max_wait: Duration) -> Self {
        Self {
            state: WaiterState::Timeout,
            reason: Some(format!(
                "tasks did not stop within {}s",
                max_wait.as_secs()
            )),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == WaiterState::Success
    }
}

/// Waits until all tasks in `request` are STOPPED, bounded by `max_wait`
pub async fn wait_until_tasks_stopped<A>(
    api: &A,
    request: &DescribeTasksRequest,
    max_wait: Duration,
    config: &WaiterConfig,
) -> WaiterResult
where
    A: ClusterApi + ?Sized,
{
    match tokio::time::timeout(max_wait, poll_until_stopped(api, request, config)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Gave up waiting for tasks {:?} after {:?}", request.tasks, max_wait);
            WaiterResult::timeout(max_wait)
        }
    }
}

async fn poll_until_stopped<A>(
    api: &A,
    request: &DescribeTasksRequest,
    config: &WaiterConfig,
) -> WaiterResult
where
    A: ClusterApi + ?Sized,
{
    let mut delay = config.min_delay;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match api.describe_tasks(request.clone()).await {
            Ok(response) => {
                if !response.failures.is_empty() {
                    return WaiterResult::failure(serialize_failures(&response.failures));
                }

                if !response.tasks.is_empty() && response.tasks.iter().all(|t| t.is_stopped()) {
                    debug!("Tasks stopped after {} check(s)", attempt);
                    return WaiterResult::success();
                }

                let statuses: Vec<&str> = response
                    .tasks
                    .iter()
                    .map(|t| t.last_status.as_deref().unwrap_or("UNKNOWN"))
                    .collect();
                debug!(
                    "Check {}: tasks not stopped yet ({:?}), next check in {:?}",
                    attempt, statuses, delay
                );
            }
            Err(e) if e.is_throttling() => {
                warn!("Throttled while waiting for tasks, backing off: {}", e);
            }
            Err(e) => return WaiterResult::failure(e.to_string()),
        }

        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(config.max_delay);
    }
}
