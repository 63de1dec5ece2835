//! run-fargate-task
//!
//! Pipeline step that launches one Fargate task, optionally waits for it to
//! stop, and records the result as step outputs.
//!
//! Every flag can also be supplied through the matching `INPUT_*` variable
//! the pipeline runner sets for step inputs.

mod config;
mod input;
mod output;
mod report;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use fargate_client::EcsClient;
use fargate_runner::TaskRunner;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::input::{non_empty, parse_bool, parse_json, parse_list};
use crate::output::OutputSink;

#[derive(Parser)]
#[command(name = "run-fargate-task")]
#[command(about = "Run a task on AWS Fargate and wait for it to exit", long_about = None)]
struct Cli {
    /// Task definition family, family:revision or full ARN
    #[arg(long, env = "INPUT_TASK-DEFINITION")]
    task_definition: String,

    /// Cluster name or ARN (default cluster when empty)
    #[arg(long, env = "INPUT_CLUSTER")]
    cluster: Option<String>,

    /// Comma-separated subnet IDs
    #[arg(long, env = "INPUT_SUBNETS", default_value = "")]
    subnets: String,

    /// Comma-separated security group IDs (also read from `INPUT_SECURITYGROUPS`)
    #[arg(long, env = "INPUT_SECURITY-GROUPS", default_value = "")]
    security_groups: String,

    /// Give the task a public IP (needed for outbound access without a NAT)
    #[arg(long, env = "INPUT_ASSIGN-PUBLIC-IP", default_value = "false", value_parser = parse_bool, action = ArgAction::Set)]
    assign_public_ip: bool,

    /// Task overrides as a JSON object
    #[arg(long, env = "INPUT_OVERRIDES", default_value = "")]
    overrides: String,

    /// Wait for the task to stop
    #[arg(long, env = "INPUT_WAIT-FOR-TASK", default_value = "true", value_parser = parse_bool, action = ArgAction::Set)]
    wait_for_task: bool,

    /// Fail the step if the task does not exit cleanly
    #[arg(long, env = "INPUT_FAIL-ON-TASK-ERROR", default_value = "false", value_parser = parse_bool, action = ArgAction::Set)]
    fail_on_task_error: bool,

    /// Maximum time to wait for the task, in seconds
    #[arg(long, env = "INPUT_MAX-WAIT", default_value_t = 1800)]
    max_wait: u64,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom ECS endpoint
    #[arg(long, env = "AWS_ENDPOINT_URL_ECS")]
    endpoint_url: Option<String>,

    /// File step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for outputs and annotations
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fargate_cli=info,fargate_runner=info,fargate_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            output::annotate_error(&usage_error(&e));
            return ExitCode::FAILURE;
        }
    };
    let sink = OutputSink::from_path(non_empty_path(cli.output_file.clone()));

    match run(cli, &sink).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            output::annotate_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, sink: &OutputSink) -> Result<()> {
    let config = load_config(cli)?;
    config.validate()?;

    let runner_config = config.runner_config();
    runner_config.validate()?;

    let client = EcsClient::new(config.client_config()?).context("Failed to build ECS client")?;
    info!(
        "Using ECS endpoint {} ({})",
        client.endpoint(),
        client.region()
    );

    let runner = TaskRunner::new(Arc::new(client), runner_config);
    let outcome = runner.run(&config.run_request(), config.wait_for_task).await;

    report::print_summary(&outcome);
    report::publish(&outcome, sink).context("Failed to record step outputs")?;
    report::verdict(&outcome, config.fail_on_task_error)
}

/// Turns raw inputs into a typed configuration
fn load_config(cli: Cli) -> Result<Config> {
    load_config_with(cli, |name| std::env::var(name).ok())
}

/// Like [`load_config`], resolving fallback variables through `env`
fn load_config_with(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let overrides = parse_json(&cli.overrides).context("Invalid overrides input")?;

    let region = non_empty(cli.region).or_else(|| non_empty(env("AWS_DEFAULT_REGION")));
    let endpoint_url = non_empty(cli.endpoint_url).or_else(|| non_empty(env("AWS_ENDPOINT_URL")));
    // Workflows written against the camelCase `securityGroups` input
    let security_groups = non_empty(Some(cli.security_groups))
        .or_else(|| non_empty(env("INPUT_SECURITYGROUPS")))
        .unwrap_or_default();

    Ok(Config {
        task_definition: cli.task_definition,
        cluster: non_empty(cli.cluster),
        subnets: parse_list(&cli.subnets),
        security_groups: parse_list(&security_groups),
        assign_public_ip: cli.assign_public_ip,
        overrides,
        wait_for_task: cli.wait_for_task,
        fail_on_task_error: cli.fail_on_task_error,
        max_wait: Duration::from_secs(cli.max_wait),
        region,
        endpoint_url,
    })
}

/// Single-line message for a command line that failed to parse
fn usage_error(error: &clap::Error) -> String {
    error
        .to_string()
        .lines()
        .next()
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ")
        .to_string()
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
