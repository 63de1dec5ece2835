//! Run request domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Network placement for a Fargate task
///
/// Subnets and security groups have set semantics: duplicates collapse and
/// order is not significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    subnets: BTreeSet<String>,
    security_groups: BTreeSet<String>,
    /// Only affects outbound connectivity of the task
    assign_public_ip: bool,
}

impl NetworkConfig {
    pub fn new<S, G>(subnets: S, security_groups: G, assign_public_ip: bool) -> Self
    where
        S: IntoIterator<Item = String>,
        G: IntoIterator<Item = String>,
    {
        Self {
            subnets: subnets.into_iter().collect(),
            security_groups: security_groups.into_iter().collect(),
            assign_public_ip,
        }
    }

    pub fn subnets(&self) -> &BTreeSet<String> {
        &self.subnets
    }

    pub fn security_groups(&self) -> &BTreeSet<String> {
        &self.security_groups
    }

    pub fn assign_public_ip(&self) -> bool {
        self.assign_public_ip
    }
}

/// Request to run one instance of a task definition
///
/// Immutable once built; the launcher consumes it once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    task_definition: String,
    cluster: Option<String>,
    network: NetworkConfig,
    /// Passed through to the API untouched
    overrides: Option<serde_json::Value>,
}

impl RunRequest {
    /// Creates a request for the default cluster with no overrides
    pub fn new(task_definition: impl Into<String>, network: NetworkConfig) -> Self {
        Self {
            task_definition: task_definition.into(),
            cluster: None,
            network,
            overrides: None,
        }
    }

    /// Targets a specific cluster (name or ARN)
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Attaches a task override payload
    pub fn with_overrides(mut self, overrides: serde_json::Value) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn task_definition(&self) -> &str {
        &self.task_definition
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn overrides(&self) -> Option<&serde_json::Value> {
        self.overrides.as_ref()
    }
}
