//! Task DTOs: RunTask and DescribeTasks

use serde::{Deserialize, Serialize};

use crate::domain::failure::Failure;
use crate::domain::request::RunRequest;
use crate::domain::task::Task;

/// Compute platform a task is launched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchType {
    Fargate,
    Ec2,
    External,
}

/// Whether the task's network interface receives a public IP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

impl From<bool> for AssignPublicIp {
    fn from(enabled: bool) -> Self {
        if enabled {
            AssignPublicIp::Enabled
        } else {
            AssignPublicIp::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: AssignPublicIp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub awsvpc_configuration: AwsVpcConfiguration,
}

/// RunTask request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskRequest {
    pub task_definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    pub launch_type: LaunchType,
    pub count: u32,
    pub network_configuration: NetworkConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl RunTaskRequest {
    /// Builds a Fargate request for exactly one task
    pub fn single_fargate(request: &RunRequest) -> Self {
        let network = request.network();
        Self {
            task_definition: request.task_definition().to_string(),
            cluster: request.cluster().map(str::to_string),
            launch_type: LaunchType::Fargate,
            count: 1,
            network_configuration: NetworkConfiguration {
                awsvpc_configuration: AwsVpcConfiguration {
                    subnets: network.subnets().iter().cloned().collect(),
                    security_groups: network.security_groups().iter().cloned().collect(),
                    assign_public_ip: network.assign_public_ip().into(),
                },
            },
            overrides: request.overrides().cloned(),
            started_by: None,
            client_token: None,
        }
    }

    pub fn started_by(mut self, started_by: impl Into<String>) -> Self {
        self.started_by = Some(started_by.into());
        self
    }

    pub fn client_token(mut self, token: impl Into<String>) -> Self {
        self.client_token = Some(token.into());
        self
    }
}

/// RunTask response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

/// DescribeTasks request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksRequest {
    pub tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

impl DescribeTasksRequest {
    /// Describes a single task of a cluster
    pub fn single(task_arn: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            tasks: vec![task_arn.into()],
            cluster: Some(cluster.into()),
        }
    }
}

/// DescribeTasks response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeTasksResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}
