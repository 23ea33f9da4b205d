//! MCP transport abstraction
//!
//! A [`Transport`] opens [`Session`]s against the documentation service.
//! Each remote call gets its own session, which the caller must close on
//! both success and failure.

mod http;
mod jsonrpc;
mod sse;

#[cfg(test)]
pub(crate) mod mock;

pub use http::{HttpTransport, DEFAULT_ENDPOINT, PROTOCOL_VERSION};
pub use jsonrpc::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
pub use sse::SseDecoder;

use crate::types::ToolResult;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the MCP server
///
/// The `Display` text is what the retry classifier inspects, so timeouts
/// mention "timeout" and connect failures mention "Connection".
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to build the HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// API key cannot be sent as a header
    #[error("Invalid API key: not a valid header value")]
    InvalidApiKey,

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Could not connect to the server
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Response body, trimmed
        body: String,
    },

    /// Server answered with a JSON-RPC error
    #[error("MCP error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Server-provided message
        message: String,
    },

    /// Tool ran but reported failure
    #[error("{0}")]
    Tool(String),

    /// Response could not be understood
    #[error("Invalid MCP response: {0}")]
    Protocol(String),

    /// Other request error
    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Create an error from a reqwest error
    ///
    /// The request URL is stripped so that the classifier only sees the
    /// failure itself, never digits from a host, port or path.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Opens sessions against an MCP server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging
    fn name(&self) -> &'static str;

    /// Open and initialize a new session
    async fn connect(&self) -> Result<Box<dyn Session>, TransportError>;
}

/// An initialized MCP session
#[async_trait]
pub trait Session: Send {
    /// Invoke a tool and return its result as sent by the server
    async fn call_tool(&mut self, name: &str, arguments: Value)
        -> Result<ToolResult, TransportError>;

    /// Release server-side resources; errors are logged, not returned
    async fn close(&mut self);
}
