//! Task-related API operations

use async_trait::async_trait;
use fargate_core::dto::task::{
    DescribeTasksRequest, DescribeTasksResponse, RunTaskRequest, RunTaskResponse,
};

use crate::api::ClusterApi;
use crate::error::{ClientError, Result};
use crate::waiter::WaiterConfig;
use crate::EcsClient;

impl EcsClient {
    // =============================================================================
    // Task Lifecycle
    // =============================================================================

    /// Start tasks from a task definition
    ///
    /// # Arguments
    /// * `req` - The RunTask request body
    ///
    /// # Returns
    /// The started tasks and any per-resource failures
    pub async fn run_task(&self, req: RunTaskRequest) -> Result<RunTaskResponse> {
        if req.task_definition.is_empty() {
            return Err(ClientError::InvalidRequest(
                "task definition must not be empty".to_string(),
            ));
        }

        self.send_operation("RunTask", &req).await
    }

    /// Describe tasks of a cluster
    ///
    /// # Arguments
    /// * `req` - Task ARNs (or IDs) and the cluster they run on
    ///
    /// # Returns
    /// The described tasks and any per-resource failures (e.g. `MISSING`)
    pub async fn describe_tasks(&self, req: DescribeTasksRequest) -> Result<DescribeTasksResponse> {
        if req.tasks.is_empty() {
            return Err(ClientError::InvalidRequest(
                "at least one task must be described".to_string(),
            ));
        }

        self.send_operation("DescribeTasks", &req).await
    }
}

#[async_trait]
impl ClusterApi for EcsClient {
    async fn run_task(&self, request: RunTaskRequest) -> Result<RunTaskResponse> {
        EcsClient::run_task(self, request).await
    }

    async fn describe_tasks(&self, request: DescribeTasksRequest) -> Result<DescribeTasksResponse> {
        EcsClient::describe_tasks(self, request).await
    }

    fn waiter_config(&self) -> WaiterConfig {
        self.config.waiter.clone()
    }
}
