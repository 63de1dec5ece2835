//! Runner configuration

use std::time::Duration;
use thiserror::Error;

/// Longest `startedBy` tag the scheduler accepts
const MAX_STARTED_BY_LEN: usize = 128;

/// Tunables of the lifecycle controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Budget for the wait-until-stopped call
    pub max_wait: Duration,

    /// Tag recorded on launched tasks
    pub started_by: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_wait must be greater than 0")]
    ZeroMaxWait,
    #[error("started_by must be 1 to {max} characters, got {0}", max = MAX_STARTED_BY_LEN)]
    StartedByLength(usize),
}

impl RunnerConfig {
    /// Default wait budget
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1800);

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_started_by(mut self, started_by: impl Into<String>) -> Self {
        self.started_by = started_by.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_wait.is_zero() {
            return Err(ConfigError::ZeroMaxWait);
        }

        let len = self.started_by.chars().count();
        if len == 0 || len > MAX_STARTED_BY_LEN {
            return Err(ConfigError::StartedByLength(len));
        }

        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_wait: Self::DEFAULT_MAX_WAIT,
            started_by: "run-fargate-task".to_string(),
        }
    }
}
