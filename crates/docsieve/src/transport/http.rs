//! Streamable HTTP transport for MCP

use super::jsonrpc::{response_for, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use super::sse::SseDecoder;
use super::{Session, Transport, TransportError};
use crate::types::ToolResult;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Hosted Context7 MCP endpoint
pub const DEFAULT_ENDPOINT: &str = "https://mcp.context7.com/mcp";

/// MCP protocol revision sent in `initialize`
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Session id header issued by the server
const SESSION_HEADER: &str = "mcp-session-id";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// MCP over Streamable HTTP
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport for `endpoint`
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            api_key: None,
        }
    }

    /// Send `key` as a bearer token
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| TransportError::InvalidApiKey)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(TransportError::ClientBuild)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn connect(&self) -> Result<Box<dyn Session>, TransportError> {
        let mut session = HttpSession {
            client: self.build_client()?,
            endpoint: self.endpoint.clone(),
            session_id: None,
            next_id: 1,
        };

        if let Err(err) = session.initialize().await {
            session.close().await;
            return Err(err);
        }
        Ok(Box::new(session))
    }
}

/// One initialized MCP session over HTTP
struct HttpSession {
    client: reqwest::Client,
    endpoint: Url,
    session_id: Option<String>,
    next_id: u64,
}

impl HttpSession {
    async fn initialize(&mut self) -> Result<(), TransportError> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;
        debug!(
            server = ?result.get("serverInfo"),
            protocol = ?result.get("protocolVersion"),
            "MCP session initialized"
        );

        self.post(&JsonRpcNotification::new("notifications/initialized"))
            .await?;
        Ok(())
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<Value, TransportError> {
        let id = self.next_id;
        self.next_id += 1;

        let response = self.post(&JsonRpcRequest::new(id, method, params)).await?;
        read_response(response, id).await?.into_result()
    }

    async fn post<T: Serialize + Sync>(
        &mut self,
        body: &T,
    ) -> Result<reqwest::Response, TransportError> {
        let mut request = self.client.post(self.endpoint.clone()).json(body);
        if let Some(id) = &self.session_id {
            request = request.header(SESSION_HEADER, id);
        }

        let response = request.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status,
                body: body.trim().to_string(),
            });
        }

        if let Some(id) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            if self.session_id.as_deref() != Some(id) {
                debug!(session_id = id, "MCP session id assigned");
                self.session_id = Some(id.to_string());
            }
        }
        Ok(response)
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolResult, TransportError> {
        debug!(tool = name, "Calling MCP tool");
        let result = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        serde_json::from_value(result).map_err(|e| TransportError::Protocol(e.to_string()))
    }

    async fn close(&mut self) {
        let Some(id) = self.session_id.take() else {
            return;
        };
        match self
            .client
            .delete(self.endpoint.clone())
            .header(SESSION_HEADER, &id)
            .send()
            .await
        {
            Ok(response) => debug!(status = %response.status(), "MCP session closed"),
            Err(err) => debug!("Failed to close MCP session {}: {}", id, err),
        }
    }
}

/// Read the response to request `id` from a JSON or SSE body
async fn read_response(
    response: reqwest::Response,
    id: u64,
) -> Result<JsonRpcResponse, TransportError> {
    let is_stream = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/event-stream"));

    if !is_stream {
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;
        return serde_json::from_slice(&body).map_err(|e| TransportError::Protocol(e.to_string()));
    }

    let mut decoder = SseDecoder::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(TransportError::from_reqwest)?;
        for payload in decoder.feed(&chunk) {
            if let Some(message) = response_for(&payload, id)? {
                return Ok(message);
            }
        }
    }
    if let Some(payload) = decoder.finish() {
        if let Some(message) = response_for(&payload, id)? {
            return Ok(message);
        }
    }

    Err(TransportError::Protocol(format!(
        "event stream ended without a response to request {}",
        id
    )))
}
