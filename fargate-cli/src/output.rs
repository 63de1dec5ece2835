//! Step outputs
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` when the runner
//! provides one, otherwise printed to stdout as `name=value` lines.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Where step outputs are written
#[derive(Debug, Clone)]
pub enum OutputSink {
    File(PathBuf),
    Stdout,
}

impl OutputSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => OutputSink::File(path),
            None => OutputSink::Stdout,
        }
    }

    /// Records one output value
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let entry = format_output(name, value);

        match self {
            OutputSink::File(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open output file {}", path.display()))?;
                file.write_all(entry.as_bytes())
                    .with_context(|| format!("Failed to write output {}", name))?;
            }
            OutputSink::Stdout => print!("{}", entry),
        }

        Ok(())
    }
}

/// Formats an output entry, using a heredoc delimiter for multi-line values
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
    } else {
        format!("{}={}\n", name, value)
    }
}

/// Emits an error annotation for the pipeline log
pub fn annotate_error(message: &str) {
    println!("{}", error_annotation(message));
}

/// Formats an error annotation as a single workflow command line
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_annotation(message))
}

fn escape_annotation(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
