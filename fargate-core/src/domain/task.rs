//! Task domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last status reported for a task whose containers have all exited
pub const STATUS_STOPPED: &str = "STOPPED";

/// A task as described by the cluster API
///
/// Fields are optional because the API omits anything it has no value for;
/// a freshly launched task has no containers exit codes yet, for example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_reason: Option<String>,
    /// Epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<f64>,
    /// Epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<Container>>,
}

/// The task object returned by a successful launch, handed to the exit waiter
pub type TaskHandle = Task;

impl Task {
    /// Returns true once the scheduler reports the task as stopped
    pub fn is_stopped(&self) -> bool {
        self.last_status.as_deref() == Some(STATUS_STOPPED)
    }

    pub fn started_time(&self) -> Option<DateTime<Utc>> {
        self.started_at.and_then(epoch_to_datetime)
    }

    pub fn stopped_time(&self) -> Option<DateTime<Utc>> {
        self.stopped_at.and_then(epoch_to_datetime)
    }

    /// Wall-clock run time, if both timestamps are known
    pub fn run_duration(&self) -> Option<chrono::Duration> {
        Some(self.stopped_time()? - self.started_time()?)
    }
}

/// Final state of one container of a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
}

impl Container {
    /// A container failed unless it reported exit code zero.
    ///
    /// A container that never produced an exit code (e.g. it could not be
    /// started) counts as failed.
    pub fn is_failed(&self) -> bool {
        self.exit_code != Some(0)
    }

    /// One-line diagnostic for a failed container
    pub fn describe_failure(&self) -> String {
        let reason = self.reason.as_deref().unwrap_or("no reason given");
        match self.exit_code {
            Some(code) => format!(
                "container {} exited with code {}: {}",
                self.name, code, reason
            ),
            None => format!("container {} has no exit code: {}", self.name, reason),
        }
    }
}

fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.trunc() as i64;
    let nanos = (secs.fract() * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole, nanos.min(999_999_999))
}
