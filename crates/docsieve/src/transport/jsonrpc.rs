//! JSON-RPC 2.0 envelopes, client side

use super::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    /// Create a request
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 notification (no id, no response)
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification<'a> {
    jsonrpc: &'static str,
    method: &'a str,
}

impl<'a> JsonRpcNotification<'a> {
    /// Create a notification without params
    pub fn new(method: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
        }
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// Id of the request this answers
    #[serde(default)]
    pub id: Option<Value>,
    /// Success payload
    #[serde(default)]
    pub result: Option<Value>,
    /// Failure payload
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
}

impl JsonRpcResponse {
    /// Whether this answers request `id`
    pub fn answers(&self, id: u64) -> bool {
        self.id.as_ref().and_then(Value::as_u64) == Some(id)
    }

    /// The result payload, or the server's error
    pub fn into_result(self) -> Result<Value, TransportError> {
        if let Some(error) = self.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| TransportError::Protocol("response has neither result nor error".into()))
    }
}

/// Parse one message and keep it only if it is the response to `id`
///
/// Server-initiated requests and notifications on the same stream are skipped.
pub fn response_for(payload: &str, id: u64) -> Result<Option<JsonRpcResponse>, TransportError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| TransportError::Protocol(e.to_string()))?;
    if value.get("method").is_some() {
        return Ok(None);
    }
    let response: JsonRpcResponse =
        serde_json::from_value(value).map_err(|e| TransportError::Protocol(e.to_string()))?;
    Ok(response.answers(id).then_some(response))
}
