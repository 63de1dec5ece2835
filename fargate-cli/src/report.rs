//! Reporting of a run to the pipeline
//!
//! Records outputs, prints a human-readable summary and applies the
//! escalation policy: a launch failure always fails the step, a task that
//! did not exit cleanly only does so with `fail-on-task-error`.

use anyhow::Result;
use colored::*;
use fargate_runner::RunOutcome;

use crate::output::OutputSink;

/// Records the step outputs for an outcome
///
/// `task-succeeded` and `task-errors` are only set once a verdict exists.
pub fn publish(outcome: &RunOutcome, sink: &OutputSink) -> Result<()> {
    if let Some(task_arn) = outcome.task_arn() {
        sink.set("task-arn", task_arn)?;
    }

    if let Some(succeeded) = outcome.succeeded() {
        sink.set("task-succeeded", &succeeded.to_string())?;
        sink.set("task-errors", &serde_json::to_string(&outcome.errors())?)?;
    }

    Ok(())
}

/// Decides whether the outcome fails the step
pub fn verdict(outcome: &RunOutcome, fail_on_task_error: bool) -> Result<()> {
    match outcome {
        RunOutcome::LaunchFailed(error) => Err(anyhow::anyhow!("Failed to launch task: {}", error)),
        _ if outcome.succeeded() != Some(false) => Ok(()),
        _ if fail_on_task_error => Err(anyhow::anyhow!(
            "Task did not exit cleanly: {}",
            outcome.errors().join("; ")
        )),
        _ => Ok(()),
    }
}

/// Prints a summary of the outcome to stderr
pub fn print_summary(outcome: &RunOutcome) {
    let task = outcome.task_arn().unwrap_or("<unknown task>");

    match outcome {
        RunOutcome::Launched(_) => {
            eprintln!("{} Task {} launched", "▸".cyan(), task.cyan());
        }
        RunOutcome::LaunchFailed(error) => {
            eprintln!("{} Task failed to launch", "✗".red());
            eprintln!("  {}", error.to_string().red());
        }
        RunOutcome::Exited { outcome: exit, .. } if exit.succeeded => {
            eprintln!("{} Task {} succeeded", "✓".green(), task.cyan());
        }
        RunOutcome::WaitTimedOut { .. } => {
            eprintln!("{} Gave up waiting for task {}", "⚠".yellow(), task.cyan());
            print_errors(outcome);
        }
        _ => {
            eprintln!("{} Task {} failed", "✗".red(), task.cyan());
            print_errors(outcome);
        }
    }

    if let Some(timing) = timing_line(outcome) {
        eprintln!("  {} {}", "Ran:".dimmed(), timing);
    }
}

/// Start and stop times of the task as last described
fn timing_line(outcome: &RunOutcome) -> Option<String> {
    let task = outcome.latest_task()?;
    let started = task.started_time()?;
    let stopped = task.stopped_time()?;
    Some(format!(
        "{} → {} ({}s)",
        started.format("%Y-%m-%d %H:%M:%S"),
        stopped.format("%H:%M:%S"),
        (stopped - started).num_seconds()
    ))
}

fn print_errors(outcome: &RunOutcome) {
    for error in outcome.errors() {
        eprintln!("  {} {}", "-".dimmed(), error.red());
    }
}
