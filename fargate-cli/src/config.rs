//! Configuration module
//!
//! Everything one invocation needs, assembled from the pipeline inputs.

use anyhow::{Context, Result};
use fargate_client::ClientConfig;
use fargate_core::domain::request::{NetworkConfig, RunRequest};
use fargate_runner::RunnerConfig;
use std::time::Duration;

/// Region reported when none is configured
const FALLBACK_REGION: &str = "us-east-1";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Task definition family, family:revision or ARN
    pub task_definition: String,
    pub cluster: Option<String>,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: bool,
    pub overrides: Option<serde_json::Value>,

    /// Wait for the task to stop before exiting
    pub wait_for_task: bool,

    /// Fail the step when the task does not exit cleanly
    pub fail_on_task_error: bool,

    /// Budget for waiting on the task
    pub max_wait: Duration,

    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.task_definition.is_empty() {
            anyhow::bail!("task-definition is required");
        }

        if self.subnets.is_empty() {
            anyhow::bail!("subnets is required");
        }

        if self.security_groups.is_empty() {
            anyhow::bail!("security-groups is required");
        }

        if let Some(overrides) = &self.overrides {
            if !overrides.is_object() {
                anyhow::bail!("overrides must be a JSON object");
            }
        }

        // Requests go out unsigned, so the public regional endpoint would
        // reject every call
        let Some(url) = &self.endpoint_url else {
            anyhow::bail!(
                "no ECS endpoint configured: set AWS_ENDPOINT_URL_ECS to a signing proxy or emulator"
            );
        };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("endpoint-url must start with http:// or https://");
        }

        Ok(())
    }

    /// Builds the run request for the launcher
    pub fn run_request(&self) -> RunRequest {
        let network = NetworkConfig::new(
            self.subnets.iter().cloned(),
            self.security_groups.iter().cloned(),
            self.assign_public_ip,
        );

        let mut request = RunRequest::new(self.task_definition.clone(), network);
        if let Some(cluster) = &self.cluster {
            request = request.with_cluster(cluster.clone());
        }
        if let Some(overrides) = &self.overrides {
            request = request.with_overrides(overrides.clone());
        }
        request
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::default().with_max_wait(self.max_wait)
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let endpoint = self
            .endpoint_url
            .as_deref()
            .context("no ECS endpoint configured")?;
        let region = self.region.as_deref().unwrap_or(FALLBACK_REGION);

        Ok(ClientConfig::for_region(region).with_endpoint(endpoint))
    }
}
