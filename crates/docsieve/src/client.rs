//! Context7 client
//!
//! [`DocsClient`] issues the two remote calls of a question: an optional
//! `resolve-library-id` and a `query-docs` wrapped in the retry schedule.
//! Every call opens its own session and closes it before returning.

use crate::config::Config;
use crate::error::DocsError;
use crate::library::{LibraryId, Resolution};
use crate::retry::{FailureKind, FetchAttempt, RetrySchedule};
use crate::transport::{HttpTransport, Transport, TransportError};
use crate::types::ToolResult;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Tool returning documentation for a library
pub const QUERY_TOOL: &str = "query-docs";

/// Tool mapping a library name to its identifier
pub const RESOLVE_TOOL: &str = "resolve-library-id";

/// Query sent when the caller gave no topic
const DEFAULT_QUERY: &str = "documentation";

/// Client for the Context7 documentation tools
pub struct DocsClient<T: Transport> {
    transport: T,
    schedule: RetrySchedule,
    has_api_key: bool,
}

impl DocsClient<HttpTransport> {
    /// HTTP client for `config`
    pub fn from_config(config: &Config) -> Self {
        let mut transport = HttpTransport::new(config.endpoint.clone());
        if let Some(key) = &config.api_key {
            transport = transport.with_api_key(key.value());
        }
        DocsClient::new(transport)
            .with_retry_schedule(config.retry.clone())
            .with_api_key_configured(config.has_api_key())
    }
}

impl<T: Transport> DocsClient<T> {
    /// Client over `transport` with the default retry schedule
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            schedule: RetrySchedule::default(),
            has_api_key: false,
        }
    }

    /// Replace the retry schedule
    pub fn with_retry_schedule(mut self, schedule: RetrySchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Record whether an API key is configured; only affects report text
    pub fn with_api_key_configured(mut self, configured: bool) -> Self {
        self.has_api_key = configured;
        self
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// Resolve a library name with a single `resolve-library-id` call
    pub async fn resolve_library(&self, name: &str, topic: &str) -> Result<Resolution, DocsError> {
        info!("Resolving library: {}", name);
        let arguments = json!({
            "query": query_text(topic),
            "libraryName": name,
        });

        let result = self
            .call_once(RESOLVE_TOOL, arguments)
            .await
            .map_err(|err| self.resolve_failure(name, err))?;

        let resolution = Resolution::parse(result.first_text())
            .ok_or_else(|| DocsError::LibraryNotFound(name.to_string()))?;
        if !resolution.matches(name) {
            return Err(DocsError::LibraryMismatch {
                name: name.to_string(),
                id: resolution.id.to_string(),
                title: resolution.title,
            });
        }

        info!("Resolved to: {} ({})", resolution.id, resolution.title);
        Ok(resolution)
    }

    /// Fetch raw documentation text, retrying infrastructure failures
    ///
    /// Rate-limit and auth failures stop at once. Unclassified failures
    /// stop without retrying. An empty string means the service found
    /// nothing.
    pub async fn query_docs(&self, library_id: &LibraryId, topic: &str) -> Result<String, DocsError> {
        let arguments = json!({
            "libraryId": library_id.as_str(),
            "query": query_text(topic),
        });
        let attempts = self.schedule.attempts();

        let mut number = 1;
        loop {
            let attempt = match self.call_once(QUERY_TOOL, arguments.clone()).await {
                Ok(result) => return Ok(result.first_text().to_string()),
                Err(err) => FetchAttempt::failed(number, err.to_string()),
            };
            debug!(
                attempt = attempt.number,
                kind = ?attempt.kind,
                "query-docs failed: {}",
                attempt.error
            );

            match attempt.kind {
                FailureKind::RateLimit => {
                    return Err(DocsError::RateLimited {
                        has_api_key: self.has_api_key,
                    })
                }
                FailureKind::Auth => {
                    return Err(DocsError::AuthFailed {
                        has_api_key: self.has_api_key,
                    })
                }
                FailureKind::Unclassified => return Err(DocsError::FetchFailed(attempt.error)),
                FailureKind::Retryable => {}
            }

            let Some(delay) = self.schedule.delay_after(number) else {
                return Err(DocsError::RetriesExhausted {
                    attempts: number,
                    last_error: attempt.error,
                });
            };
            warn!(
                "Attempt {}/{} failed (infrastructure error), retrying in {}s...",
                number,
                attempts,
                delay.as_secs()
            );
            tokio::time::sleep(delay).await;
            number += 1;
        }
    }

    /// One tool call in a fresh session, closed on every path
    async fn call_once(&self, tool: &str, arguments: Value) -> Result<ToolResult, TransportError> {
        debug!(transport = self.transport.name(), tool, "Opening session");
        let mut session = self.transport.connect().await?;
        let result = session.call_tool(tool, arguments).await;
        session.close().await;

        let result = result?;
        if result.is_error {
            return Err(TransportError::Tool(result.first_text().to_string()));
        }
        Ok(result)
    }

    fn resolve_failure(&self, name: &str, err: TransportError) -> DocsError {
        let message = err.to_string();
        match FailureKind::classify(&message) {
            FailureKind::RateLimit => DocsError::RateLimited {
                has_api_key: self.has_api_key,
            },
            FailureKind::Auth => DocsError::AuthFailed {
                has_api_key: self.has_api_key,
            },
            _ => DocsError::ResolveFailed {
                name: name.to_string(),
                message,
            },
        }
    }
}

fn query_text(topic: &str) -> &str {
    if topic.trim().is_empty() {
        DEFAULT_QUERY
    } else {
        topic
    }
}
