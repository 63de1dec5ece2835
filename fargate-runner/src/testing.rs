//! Scripted cluster API for unit tests

use async_trait::async_trait;
use fargate_client::{ClientError, ClusterApi, Result, WaiterConfig, WaiterResult};
use fargate_core::dto::task::{
    DescribeTasksRequest, DescribeTasksResponse, RunTaskRequest, RunTaskResponse,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Cluster API double
///
/// Run and describe responses are consumed in order. When `wait` is unset the
/// trait's own waiter runs against the scripted describe responses.
#[derive(Default)]
pub struct FakeCluster {
    run: Mutex<VecDeque<Result<RunTaskResponse>>>,
    describe: Mutex<VecDeque<Result<DescribeTasksResponse>>>,
    wait: Option<WaiterResult>,
    pub run_requests: Mutex<Vec<RunTaskRequest>>,
    pub describe_requests: Mutex<Vec<DescribeTasksRequest>>,
    pub waits: Mutex<Vec<(DescribeTasksRequest, Duration)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_run(self, response: RunTaskResponse) -> Self {
        self.run.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn on_run_error(self, error: ClientError) -> Self {
        self.run.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn on_describe(self, response: DescribeTasksResponse) -> Self {
        self.describe.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn on_describe_error(self, error: ClientError) -> Self {
        self.describe.lock().unwrap().push_back(Err(error));
        self
    }

    /// Short-circuits the wait primitive with a fixed result
    pub fn on_wait(mut self, result: WaiterResult) -> Self {
        self.wait = Some(result);
        self
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_requests.lock().unwrap().len()
    }

    pub fn any_calls(&self) -> bool {
        !self.run_requests.lock().unwrap().is_empty()
            || !self.describe_requests.lock().unwrap().is_empty()
            || !self.waits.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn run_task(&self, request: RunTaskRequest) -> Result<RunTaskResponse> {
        self.run_requests.lock().unwrap().push(request);
        self.run
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected RunTask call")
    }

    async fn describe_tasks(&self, request: DescribeTasksRequest) -> Result<DescribeTasksResponse> {
        self.describe_requests.lock().unwrap().push(request);
        self.describe
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected DescribeTasks call")
    }

    fn waiter_config(&self) -> WaiterConfig {
        WaiterConfig {
            min_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(20),
        }
    }

    async fn wait_until_stopped(
        &self,
        request: &DescribeTasksRequest,
        max_wait: Duration,
    ) -> WaiterResult {
        self.waits.lock().unwrap().push((request.clone(), max_wait));
        match &self.wait {
            Some(result) => result.clone(),
            None => {
                let config = self.waiter_config();
                fargate_client::waiter::wait_until_tasks_stopped(self, request, max_wait, &config)
                    .await
            }
        }
    }
}
