//! The cluster API seam
//!
//! The task runner only depends on this trait, so tests can script responses
//! and alternative backends can be plugged in.

use async_trait::async_trait;
use fargate_core::dto::task::{
    DescribeTasksRequest, DescribeTasksResponse, RunTaskRequest, RunTaskResponse,
};
use std::time::Duration;

use crate::error::Result;
use crate::waiter::{self, WaiterConfig, WaiterResult};

/// Operations the task runner needs from the cluster scheduler
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Starts tasks from a task definition
    ///
    /// Returns the started tasks together with per-resource failures; a
    /// successful HTTP exchange does not imply a task was started.
    async fn run_task(&self, request: RunTaskRequest) -> Result<RunTaskResponse>;

    /// Describes tasks of one cluster
    async fn describe_tasks(&self, request: DescribeTasksRequest) -> Result<DescribeTasksResponse>;

    /// Polling cadence used by [`ClusterApi::wait_until_stopped`]
    fn waiter_config(&self) -> WaiterConfig {
        WaiterConfig::default()
    }

    /// Blocks until every described task is STOPPED or `max_wait` elapses
    ///
    /// Never returns an error: the outcome of the wait is reported in the
    /// [`WaiterResult`] state.
    async fn wait_until_stopped(
        &self,
        request: &DescribeTasksRequest,
        max_wait: Duration,
    ) -> WaiterResult {
        let config = self.waiter_config();
        waiter::wait_until_tasks_stopped(self, request, max_wait, &config).await
    }
}
