//! Exit outcome

use serde::{Deserialize, Serialize};

use crate::domain::task::Container;

/// Verdict for a stopped task
///
/// `errors` holds one line per failed container, in container order.
/// `succeeded` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitOutcome {
    pub succeeded: bool,
    pub errors: Vec<String>,
}

impl ExitOutcome {
    /// Classifies the final container list of a task
    pub fn from_containers(containers: &[Container]) -> Self {
        let errors: Vec<String> = containers
            .iter()
            .filter(|c| c.is_failed())
            .map(Container::describe_failure)
            .collect();

        Self {
            succeeded: errors.is_empty(),
            errors,
        }
    }
}
