//! Fargate cluster API client
//!
//! A small, type-safe HTTP client for the ECS JSON protocol, plus the
//! bounded "wait until stopped" primitive used by the task runner.
//!
//! Request signing is not handled here: point the client at an endpoint that
//! accepts unsigned requests (a signing proxy or a local emulator).
//!
//! # Example
//!
//! ```no_run
//! use fargate_client::{ClientConfig, EcsClient};
//! use fargate_core::dto::task::DescribeTasksRequest;
//!
//! #[tokio::main]
//! async fn main() -> fargate_client::Result<()> {
//!     let config = ClientConfig::for_region("eu-west-1").with_endpoint("http://localhost:4566");
//!     let client = EcsClient::new(config)?;
//!
//!     let response = client
//!         .describe_tasks(DescribeTasksRequest::single("task-arn", "cluster-arn"))
//!         .await?;
//!
//!     println!("Found {} task(s)", response.tasks.len());
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod tasks;
pub mod waiter;

// Re-export commonly used types
pub use api::ClusterApi;
pub use error::{ClientError, Result};
pub use waiter::{WaiterConfig, WaiterResult, WaiterState};

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Prefix of the `X-Amz-Target` header for every ECS operation
const TARGET_PREFIX: &str = "AmazonEC2ContainerServiceV20141113";

/// Content type of the ECS JSON protocol
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "run-fargate-task";

/// Connection settings for [`EcsClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint every operation is POSTed to
    pub endpoint: String,
    /// Region the endpoint belongs to
    pub region: String,
    pub user_agent: String,
    /// Polling cadence for the wait primitive
    pub waiter: WaiterConfig,
}

impl ClientConfig {
    /// Configuration for the public regional endpoint
    ///
    /// The public endpoint rejects unsigned requests: override it with
    /// [`ClientConfig::with_endpoint`], or pair it with a signing client
    /// through [`EcsClient::with_client`].
    pub fn for_region(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            endpoint: format!("https://ecs.{}.amazonaws.com", region),
            region,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            waiter: WaiterConfig::default(),
        }
    }

    /// Overrides the endpoint (emulators, proxies, VPC endpoints)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_waiter(mut self, waiter: WaiterConfig) -> Self {
        self.waiter = waiter;
        self
    }
}

/// HTTP client for the ECS API
///
/// Cheap to clone; each clone shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct EcsClient {
    config: ClientConfig,
    /// HTTP client instance
    client: Client,
}

impl EcsClient {
    /// Create a new client from its configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { config, client })
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    /// The configured user agent is ignored in favour of the client's own.
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Get the endpoint operations are sent to
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    // =============================================================================
    // Transport
    // =============================================================================

    /// Sends one ECS operation and decodes its response
    async fn send_operation<B, T>(&self, operation: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Sending {} to {}", operation, self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, operation))
            .header(CONTENT_TYPE, AMZ_JSON)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Error bodies carry the exception name in `__type`, optionally prefixed
    /// with a namespace (`com.amazonaws.ecs#ClusterNotFoundException`).
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let (code, message) = parse_error_body(&error_text);
            return Err(ClientError::api_error(status.as_u16(), code, message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Extracts (exception name, message) from an error body
fn parse_error_body(body: &str) -> (String, String) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return ("Unknown".to_string(), body.to_string());
    };

    let code = value
        .get("__type")
        .and_then(|v| v.as_str())
        .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let message = value
        .get("message")
        .or_else(|| value.get("Message"))
        .and_then(|v| v.as_str())
        .unwrap_or(body)
        .to_string();

    (code, message)
}
