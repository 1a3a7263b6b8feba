//! Gateway message format
//!
//! Defines the structure for all WebSocket frames.

use super::{CloseCode, HelloPayload, OpCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
///
/// All frames sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event name (Dispatch) or operation name (Request/Ack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Client nonce, echoed back on the Ack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<Value>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode) -> Self {
        Self {
            op,
            t: None,
            s: None,
            n: None,
            d: None,
        }
    }

    // === Server Messages ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
            ..Self::bare(OpCode::Dispatch)
        }
    }

    /// Create an Ack message (op=3) answering a Request
    #[must_use]
    pub fn ack(operation: impl Into<String>, nonce: Option<Value>, data: Value) -> Self {
        Self {
            t: Some(operation.into()),
            n: nonce,
            d: Some(data),
            ..Self::bare(OpCode::Ack)
        }
    }

    /// Create a Hello message (op=10)
    #[must_use]
    pub fn hello(payload: HelloPayload) -> Self {
        Self {
            d: Some(Value::from(payload)),
            ..Self::bare(OpCode::Hello)
        }
    }

    /// Create a Heartbeat ACK message (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    // === Client Messages ===

    /// Create a Request message (op=2)
    #[must_use]
    pub fn request(operation: impl Into<String>, nonce: Option<Value>, data: Value) -> Self {
        Self {
            t: Some(operation.into()),
            n: nonce,
            d: Some(data),
            ..Self::bare(OpCode::Request)
        }
    }

    /// Create a Heartbeat message (op=1)
    #[must_use]
    pub fn heartbeat() -> Self {
        Self::bare(OpCode::Heartbeat)
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Close frame code and reason
    #[must_use]
    pub fn close_frame(code: CloseCode) -> (u16, String) {
        (code.as_u16(), code.description().to_string())
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
