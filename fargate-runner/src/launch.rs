//! Task launcher
//!
//! Submits a single-task run request and checks that the scheduler actually
//! started exactly one task before handing it to the caller.

use fargate_core::domain::request::RunRequest;
use fargate_core::domain::task::{Task, TaskHandle};
use fargate_core::dto::task::{RunTaskRequest, RunTaskResponse};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::TaskRunner;
use crate::error::LaunchError;

impl TaskRunner {
    /// Launches one task and returns it unchanged
    ///
    /// # Arguments
    /// * `request` - What to run and where
    ///
    /// # Returns
    /// The task object from the run response, or a [`LaunchError`] when the
    /// response reports failures or does not hold exactly one task.
    /// The call is never retried.
    pub async fn launch(&self, request: &RunRequest) -> Result<TaskHandle, LaunchError> {
        info!(
            "Launching task definition {} on cluster {}",
            request.task_definition(),
            request.cluster().unwrap_or("default")
        );

        let body = RunTaskRequest::single_fargate(request)
            .started_by(self.config.started_by.clone())
            .client_token(Uuid::new_v4().to_string());

        let response = self.client.run_task(body).await?;
        debug!(
            "RunTask returned {} task(s) and {} failure(s)",
            response.tasks.len(),
            response.failures.len()
        );

        let task = single_task(response).inspect_err(|e| error!("Launch rejected: {}", e))?;

        info!(
            "Launched task {}",
            task.task_arn.as_deref().unwrap_or("<no arn>")
        );
        Ok(task)
    }
}

/// Validates a run response: no failures first, then exactly one task
fn single_task(response: RunTaskResponse) -> Result<Task, LaunchError> {
    if !response.failures.is_empty() {
        return Err(LaunchError::Failures {
            failures: response.failures,
        });
    }

    let [task]: [Task; 1] = response
        .tasks
        .try_into()
        .map_err(|tasks: Vec<Task>| LaunchError::TaskCount {
            expected: 1,
            actual: tasks.len(),
        })?;

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunnerConfig;
    use crate::testing::FakeCluster;
    use fargate_client::ClientError;
    use fargate_core::domain::failure::Failure;
    use fargate_core::domain::request::NetworkConfig;
    use std::sync::Arc;

    fn request() -> RunRequest {
        RunRequest::new("", NetworkConfig::new(vec![], vec![], false))
    }

    fn task(arn: &str) -> Task {
        Task {
            task_arn: Some(arn.to_string()),
            ..Default::default()
        }
    }

    fn runner(fake: &Arc<FakeCluster>) -> TaskRunner {
        TaskRunner::new(fake.clone(), RunnerConfig::default())
    }

    #[tokio::test]
    async fn test_returns_task_on_success() {
        let fake = Arc::new(FakeCluster::new().on_run(RunTaskResponse {
            tasks: vec![task("foobar")],
            failures: vec![],
        }));

        let handle = runner(&fake).launch(&request()).await.unwrap();

        assert_eq!(handle, task("foobar"));
        assert_eq!(handle.task_arn.as_deref(), Some("foobar"));
    }

    #[tokio::test]
    async fn test_sends_single_fargate_task_request() {
        let fake = Arc::new(FakeCluster::new().on_run(RunTaskResponse {
            tasks: vec![task("foobar")],
            failures: vec![],
        }));
        let request = RunRequest::new(
            "migrate:2",
            NetworkConfig::new(vec!["subnet-a".to_string()], vec!["sg-1".to_string()], true),
        )
        .with_cluster("prod");

        runner(&fake).launch(&request).await.unwrap();

        let sent = fake.run_requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].count, 1);
        assert_eq!(sent[0].cluster.as_deref(), Some("prod"));
        assert_eq!(sent[0].started_by.as_deref(), Some("run-fargate-task"));
        assert!(sent[0].client_token.is_some());
    }

    #[tokio::test]
    async fn test_fails_when_api_returns_failures() {
        let fake = Arc::new(FakeCluster::new().on_run(RunTaskResponse {
            tasks: vec![],
            failures: vec![Failure::default()],
        }));

        let err = runner(&fake).launch(&request()).await.unwrap_err();

        match err {
            LaunchError::Failures { failures } => assert_eq!(failures.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failures_win_over_a_returned_task() {
        let fake = Arc::new(FakeCluster::new().on_run(RunTaskResponse {
            tasks: vec![task("foobar")],
            failures: vec![Failure::default(), Failure::default()],
        }));

        let err = runner(&fake).launch(&request()).await.unwrap_err();

        assert!(matches!(err, LaunchError::Failures { ref failures } if failures.len() == 2));
    }

    #[tokio::test]
    async fn test_fails_on_unexpected_task_count() {
        let fake = Arc::new(
            FakeCluster::new()
                .on_run(RunTaskResponse {
                    tasks: vec![],
                    failures: vec![],
                })
                .on_run(RunTaskResponse {
                    tasks: vec![task("a"), task("b")],
                    failures: vec![],
                }),
        );
        let runner = runner(&fake);

        let first = runner.launch(&request()).await.unwrap_err();
        assert!(matches!(
            first,
            LaunchError::TaskCount {
                expected: 1,
                actual: 0
            }
        ));

        let second = runner.launch(&request()).await.unwrap_err();
        assert!(matches!(
            second,
            LaunchError::TaskCount {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_api_errors_propagate_without_retry() {
        let fake = Arc::new(
            FakeCluster::new().on_run_error(ClientError::api_error(500, "ServerException", "boom")),
        );

        let err = runner(&fake).launch(&request()).await.unwrap_err();

        assert!(matches!(err, LaunchError::Api(ref e) if e.is_server_error()));
        assert_eq!(fake.run_requests.lock().unwrap().len(), 1);
    }
}
