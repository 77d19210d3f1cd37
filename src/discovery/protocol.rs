//! JSON-RPC wire surface for tool discovery.
//!
//! The protocol modeled here is exactly the two-request exchange the
//! discovery client issues: an `initialize` handshake (id 1) followed by
//! `tools/list` (id 2), each a single newline-terminated JSON object on
//! the server's stdin. Inbound lines are classified into [`RpcMessage`];
//! anything else on the stream is noise and classifies as
//! [`RpcMessage::Unrecognized`].

use serde::Deserialize;
use serde_json::{json, Value};

/// Protocol version advertised in the `initialize` request.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Correlation ID of the `initialize` request.
pub const INITIALIZE_ID: u64 = 1;

/// Correlation ID of the `tools/list` request.
pub const LIST_TOOLS_ID: u64 = 2;

/// Build the `initialize` request, carrying the protocol version and this
/// client's identity.
#[must_use]
pub fn initialize_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": INITIALIZE_ID,
        "method": "initialize",
        "params": {
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        },
    })
}

/// Build the `tools/list` request.
#[must_use]
pub fn list_tools_request() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": LIST_TOOLS_ID,
        "method": "tools/list",
    })
}

// ── Inbound message types ─────────────────────────────────────────────────────

/// One tool advertised by a server.
///
/// Only the name propagates outward; description metadata is discarded
/// after parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolEntry {
    /// Tool name as advertised.
    pub name: String,
    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

/// `result` payload of a `tools/list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListToolsResult {
    /// Advertised tools, in response order.
    pub tools: Vec<ToolEntry>,
}

/// Inbound JSON-RPC message, classified from one framed line.
#[derive(Debug, Clone)]
pub enum RpcMessage {
    /// A request or notification from the server (carries a `method`).
    Notification {
        /// JSON-RPC method name.
        method: String,
    },
    /// A response carrying a `result` member for a request we issued.
    Response {
        /// Correlation ID echoed by the server.
        id: u64,
        /// The `result` payload, possibly `null`.
        result: Value,
    },
    /// Any message carrying an `error` member, regardless of its `id`.
    ErrorResponse {
        /// Correlation ID, when one was echoed.
        id: Option<u64>,
        /// The `error` payload.
        error: Value,
    },
    /// Fails to parse as JSON, or matches none of the recognized shapes.
    Unrecognized,
}

impl RpcMessage {
    /// Classify one framed line.
    ///
    /// Servers are known to interleave banners and log output on the same
    /// stream, so unparseable lines are not errors — they classify as
    /// [`RpcMessage::Unrecognized`] and the caller discards them.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Unrecognized;
        }
        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            return Self::Unrecognized;
        };
        let Some(obj) = value.as_object() else {
            return Self::Unrecognized;
        };

        // An `error` member aborts discovery whatever else the message
        // carries, so it is checked before the response shape.
        if let Some(error) = obj.get("error") {
            return Self::ErrorResponse {
                id: obj.get("id").and_then(Value::as_u64),
                error: error.clone(),
            };
        }
        if let (Some(id), Some(result)) = (obj.get("id").and_then(Value::as_u64), obj.get("result"))
        {
            return Self::Response {
                id,
                result: result.clone(),
            };
        }
        if let Some(method) = obj.get("method").and_then(Value::as_str) {
            return Self::Notification {
                method: method.to_owned(),
            };
        }
        Self::Unrecognized
    }
}
