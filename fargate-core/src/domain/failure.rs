//! Failure domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic returned by the cluster API when an operation could not be
/// fulfilled for a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(
        arn: Option<String>,
        reason: Option<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            arn,
            reason,
            detail,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.arn.as_deref().unwrap_or("unknown"),
            self.reason.as_deref().unwrap_or("unknown"),
            self.detail.as_deref().unwrap_or("no detail")
        )
    }
}

/// Serializes a failure list for error messages
///
/// Falls back to the debug representation if JSON encoding fails.
pub fn serialize_failures(failures: &[Failure]) -> String {
    serde_json::to_string(failures).unwrap_or_else(|_| format!("{:?}", failures))
}
