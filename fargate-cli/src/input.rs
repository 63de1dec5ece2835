//! Pipeline input parsing
//!
//! Pipeline inputs arrive as strings: lists are comma-separated, objects are
//! JSON, booleans follow the YAML 1.2 core schema.

use anyhow::{Context, Result};

/// Splits a comma-separated input; an empty input is an empty list
pub fn parse_list(list: &str) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }

    list.split(',').map(str::to_string).collect()
}

/// Parses a JSON input; an empty input is absent
pub fn parse_json(json: &str) -> Result<Option<serde_json::Value>> {
    if json.is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(json).context("Input is not valid JSON")?;
    Ok(Some(value))
}

/// Parses a boolean input
///
/// Used as a clap value parser, hence the `String` error.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(format!(
            "'{}' is not a boolean, expected one of: true | True | TRUE | false | False | FALSE",
            other
        )),
    }
}

/// Treats an empty input as not provided
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
