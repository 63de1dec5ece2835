//! Exit waiter
//!
//! Turns a task handle into an [`ExitOutcome`]:
//! 1. check the handle addresses a task (task ARN, then cluster ARN)
//! 2. block on the client's wait-until-stopped primitive
//! 3. describe the task once and classify its containers
//!
//! Containers exiting non-zero are reported in the outcome, not as errors.

use fargate_core::domain::outcome::ExitOutcome;
use fargate_core::domain::task::{Task, TaskHandle};
use fargate_core::dto::task::{DescribeTasksRequest, DescribeTasksResponse};
use tracing::{info, warn};

use crate::TaskRunner;
use crate::error::{HandleField, WaitError};

/// A handle checked to address exactly one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRef<'a> {
    pub task_arn: &'a str,
    pub cluster_arn: &'a str,
}

impl<'a> TaskRef<'a> {
    /// Borrows the task and cluster ARNs from a handle
    ///
    /// The task ARN is checked first. Empty strings count as missing.
    pub fn from_handle(handle: &'a TaskHandle) -> Result<Self, WaitError> {
        let task_arn = non_empty(handle.task_arn.as_deref())
            .ok_or(WaitError::InvalidHandle(HandleField::TaskArn))?;
        let cluster_arn = non_empty(handle.cluster_arn.as_deref())
            .ok_or(WaitError::InvalidHandle(HandleField::ClusterArn))?;

        Ok(Self {
            task_arn,
            cluster_arn,
        })
    }

    pub fn describe_request(&self) -> DescribeTasksRequest {
        DescribeTasksRequest::single(self.task_arn, self.cluster_arn)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The classified exit of a task together with its final described state
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReport {
    /// The task as described after it stopped, absent when describe returned none
    pub task: Option<Task>,
    pub outcome: ExitOutcome,
}

impl TaskRunner {
    /// Waits for a launched task to stop and classifies its containers
    ///
    /// # Arguments
    /// * `handle` - The task returned by [`TaskRunner::launch`]
    ///
    /// # Returns
    /// The exit outcome, or a [`WaitError`] when the handle is incomplete,
    /// the wait does not succeed within the budget, or the final describe
    /// reports failures.
    pub async fn wait_for_exit(&self, handle: &TaskHandle) -> Result<ExitOutcome, WaitError> {
        self.wait_for_report(handle).await.map(|report| report.outcome)
    }

    /// Like [`TaskRunner::wait_for_exit`], keeping the described task
    ///
    /// The described task carries the start and stop timestamps the run
    /// response cannot have.
    pub async fn wait_for_report(&self, handle: &TaskHandle) -> Result<ExitReport, WaitError> {
        let task = TaskRef::from_handle(handle)?;
        let request = task.describe_request();

        info!(
            "Waiting up to {}s for task {} to stop",
            self.config.max_wait.as_secs(),
            task.task_arn
        );

        let waited = self
            .client
            .wait_until_stopped(&request, self.config.max_wait)
            .await;

        if !waited.is_success() {
            warn!(
                "Wait for task {} ended in state {}: {}",
                task.task_arn,
                waited.state,
                waited.reason.as_deref().unwrap_or("no reason given")
            );
            return Err(WaitError::WaitFailed {
                state: waited.state,
                reason: waited.reason,
            });
        }

        let response = self.client.describe_tasks(request).await?;
        let report = classify(response)?;
        let outcome = &report.outcome;

        if outcome.succeeded {
            info!("Task {} stopped, all containers exited cleanly", task.task_arn);
        } else {
            warn!(
                "Task {} stopped with {} failed container(s)",
                task.task_arn,
                outcome.errors.len()
            );
        }

        Ok(report)
    }
}

/// Classifies the describe response of a stopped task
fn classify(response: DescribeTasksResponse) -> Result<ExitReport, WaitError> {
    if !response.failures.is_empty() {
        return Err(WaitError::DescribeFailed {
            failures: response.failures,
        });
    }

    let Some(task) = response.tasks.into_iter().next() else {
        warn!("Describe returned no task; treating it as having no containers");
        return Ok(ExitReport {
            task: None,
            outcome: ExitOutcome::from_containers(&[]),
        });
    };

    if let Some(reason) = &task.stopped_reason {
        info!("Stopped reason: {}", reason);
    }
    if let Some(duration) = task.run_duration() {
        info!("Task ran for {}s", duration.num_seconds());
    }

    let outcome = ExitOutcome::from_containers(task.containers.as_deref().unwrap_or_default());
    Ok(ExitReport {
        task: Some(task),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunnerConfig;
    use crate::testing::FakeCluster;
    use fargate_client::{ClientError, WaiterResult, WaiterState};
    use fargate_core::domain::failure::Failure;
    use fargate_core::domain::task::{Container, Task};
    use std::sync::Arc;
    use std::time::Duration;

    fn handle() -> TaskHandle {
        Task {
            task_arn: Some("foobar".to_string()),
            cluster_arn: Some("bar".to_string()),
            ..Default::default()
        }
    }

    fn stopped() -> DescribeTasksResponse {
        DescribeTasksResponse {
            tasks: vec![Task {
                last_status: Some("STOPPED".to_string()),
                ..Default::default()
            }],
            failures: vec![],
        }
    }

    fn with_containers(containers: Vec<Container>) -> DescribeTasksResponse {
        DescribeTasksResponse {
            tasks: vec![Task {
                last_status: Some("STOPPED".to_string()),
                containers: Some(containers),
                ..Default::default()
            }],
            failures: vec![],
        }
    }

    fn container(name: &str, exit_code: i32, reason: Option<&str>) -> Container {
        Container {
            name: name.to_string(),
            exit_code: Some(exit_code),
            reason: reason.map(str::to_string),
            last_status: Some("STOPPED".to_string()),
        }
    }

    fn runner(fake: &Arc<FakeCluster>) -> TaskRunner {
        TaskRunner::new(fake.clone(), RunnerConfig::default())
    }

    #[tokio::test]
    async fn test_missing_task_arn_is_rejected_before_any_call() {
        let fake = Arc::new(FakeCluster::new());
        let handle = Task {
            cluster_arn: Some("bar".to_string()),
            ..Default::default()
        };

        let err = runner(&fake).wait_for_exit(&handle).await.unwrap_err();

        assert!(matches!(err, WaitError::InvalidHandle(HandleField::TaskArn)));
        assert!(!fake.any_calls());
    }

    #[tokio::test]
    async fn test_missing_cluster_arn_is_rejected_before_any_call() {
        let fake = Arc::new(FakeCluster::new());
        let handle = Task {
            task_arn: Some("foobar".to_string()),
            ..Default::default()
        };

        let err = runner(&fake).wait_for_exit(&handle).await.unwrap_err();

        assert!(matches!(err, WaitError::InvalidHandle(HandleField::ClusterArn)));
        assert!(!fake.any_calls());
    }

    #[tokio::test]
    async fn test_task_arn_is_checked_first() {
        let fake = Arc::new(FakeCluster::new());

        let err = runner(&fake)
            .wait_for_exit(&Task::default())
            .await
            .unwrap_err();

        assert!(matches!(err, WaitError::InvalidHandle(HandleField::TaskArn)));
    }

    #[tokio::test]
    async fn test_empty_arns_count_as_missing() {
        let fake = Arc::new(FakeCluster::new());
        let handle = Task {
            task_arn: Some("foobar".to_string()),
            cluster_arn: Some(String::new()),
            ..Default::default()
        };

        let err = runner(&fake).wait_for_exit(&handle).await.unwrap_err();

        assert!(matches!(err, WaitError::InvalidHandle(HandleField::ClusterArn)));
    }

    #[tokio::test]
    async fn test_reports_failed_container() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_describe(stopped())
                .on_describe(with_containers(vec![container("foobar", 1, Some("test"))])),
        );

        let outcome = runner(&fake).wait_for_exit(&handle()).await.unwrap();

        assert!(!outcome.succeeded);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("foobar"));
        assert!(outcome.errors[0].contains("test"));
    }

    #[tokio::test]
    async fn test_succeeds_when_all_containers_exit_zero() {
        let fake = Arc::new(
            FakeCluster::new().on_describe(stopped()).on_describe(with_containers(vec![
                container("app", 0, None),
                container("sidecar", 0, Some("Essential container exited")),
            ])),
        );

        let outcome = runner(&fake).wait_for_exit(&handle()).await.unwrap();

        assert!(outcome.succeeded);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_errors_follow_container_order() {
        let fake = Arc::new(FakeCluster::new().on_wait(WaiterResult::success()).on_describe(
            with_containers(vec![
                container("b", 2, None),
                container("ok", 0, None),
                container("a", 137, Some("OutOfMemoryError")),
            ]),
        ));

        let outcome = runner(&fake).wait_for_exit(&handle()).await.unwrap();

        assert!(!outcome.succeeded);
        assert!(outcome.errors[0].contains("container b"));
        assert!(outcome.errors[1].contains("container a"));
        assert!(outcome.errors[1].contains("137"));
    }

    #[tokio::test]
    async fn test_describe_failures_are_fatal_after_successful_wait() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_wait(WaiterResult::success())
                .on_describe(DescribeTasksResponse {
                    tasks: vec![],
                    failures: vec![Failure::new(
                        Some("foobar".to_string()),
                        Some("MISSING".to_string()),
                        None,
                    )],
                }),
        );

        let err = runner(&fake).wait_for_exit(&handle()).await.unwrap_err();

        match err {
            WaitError::DescribeFailed { failures } => {
                assert_eq!(failures[0].reason.as_deref(), Some("MISSING"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsuccessful_wait_skips_describe() {
        let fake = Arc::new(FakeCluster::new().on_wait(WaiterResult::timeout(Duration::from_secs(1800))));

        let err = runner(&fake).wait_for_exit(&handle()).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(fake.describe_calls(), 0);
    }

    #[tokio::test]
    async fn test_wait_failure_carries_state() {
        let fake = Arc::new(FakeCluster::new().on_wait(WaiterResult::failure("MISSING")));

        let err = runner(&fake).wait_for_exit(&handle()).await.unwrap_err();

        match err {
            WaitError::WaitFailed { state, reason } => {
                assert_eq!(state, WaiterState::Failure);
                assert_eq!(reason.as_deref(), Some("MISSING"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_uses_configured_budget_and_handle() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_wait(WaiterResult::success())
                .on_describe(with_containers(vec![])),
        );
        let runner = TaskRunner::new(
            fake.clone(),
            RunnerConfig::default().with_max_wait(Duration::from_secs(90)),
        );

        runner.wait_for_exit(&handle()).await.unwrap();

        let waits = fake.waits.lock().unwrap();
        assert_eq!(waits[0].1, Duration::from_secs(90));
        assert_eq!(waits[0].0, DescribeTasksRequest::single("foobar", "bar"));
        assert_eq!(
            fake.describe_requests.lock().unwrap()[0],
            DescribeTasksRequest::single("foobar", "bar")
        );
    }

    #[tokio::test]
    async fn test_missing_task_or_containers_is_empty_success() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_wait(WaiterResult::success())
                .on_describe(DescribeTasksResponse::default()),
        );

        let outcome = runner(&fake).wait_for_exit(&handle()).await.unwrap();

        assert!(outcome.succeeded);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_describe_api_error_propagates() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_wait(WaiterResult::success())
                .on_describe_error(ClientError::api_error(500, "ServerException", "boom")),
        );

        let err = runner(&fake).wait_for_exit(&handle()).await.unwrap_err();

        assert!(matches!(err, WaitError::Api(_)));
    }

    #[tokio::test]
    async fn test_report_keeps_described_task() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_wait(WaiterResult::success())
                .on_describe(DescribeTasksResponse {
                    tasks: vec![Task {
                        last_status: Some("STOPPED".to_string()),
                        started_at: Some(1_700_000_000.0),
                        stopped_at: Some(1_700_000_042.0),
                        containers: Some(vec![container("app", 0, None)]),
                        ..Default::default()
                    }],
                    failures: vec![],
                }),
        );

        let report = runner(&fake).wait_for_report(&handle()).await.unwrap();

        assert!(report.outcome.succeeded);
        let task = report.task.unwrap();
        assert_eq!(task.run_duration().unwrap().num_seconds(), 42);
    }
}
