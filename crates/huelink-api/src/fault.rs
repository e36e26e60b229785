// Uniform fault model
//
// The bridge reports failures as `[{"error": {"type", "address", "description"}}]`.
// Transport failures are synthesized in exactly the same shape, so a single
// predicate and a single tagged type cover both.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Reserved code for "neither plaintext nor TLS attempt completed".
pub const CONNECT_FAILED: i64 = 9999;

/// Reserved code for "bridge answered, but not in a shape we understand".
pub const UNEXPECTED_RESPONSE: i64 = 9998;

/// A bridge-reported or locally synthesized failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeFault {
    #[serde(rename = "type")]
    pub code: i64,
    #[serde(default)]
    pub description: String,
    /// Resource path the bridge blames, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Offending payload, kept for diagnostics on 9998 faults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl BridgeFault {
    pub fn new(code: i64, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            address: None,
            raw: None,
        }
    }

    /// Both transport attempts failed; `cause` is the last attempt's error.
    pub fn connect_failed(cause: &crate::Error) -> Self {
        Self::new(CONNECT_FAILED, format!("connect_failed: {}", cause.chain()))
    }

    /// The bridge answered with something other than the expected shape.
    pub fn unexpected_response(raw: Value) -> Self {
        Self {
            raw: Some(raw),
            ..Self::new(UNEXPECTED_RESPONSE, "unexpected_response")
        }
    }

    pub fn is_connect_failure(&self) -> bool {
        self.code == CONNECT_FAILED
    }

    /// The wire shape: a one-element list holding `{"error": {...}}`.
    pub fn to_wire(&self) -> Value {
        json!([{ "error": self }])
    }

    /// Extract the fault from a wire payload, if [`error_returned`] holds.
    ///
    /// An error object the bridge filled in oddly (missing `type`, wrong
    /// types) still counts as a fault; it becomes a 9998 carrying the object.
    pub fn from_wire(answer: &Value) -> Option<Self> {
        if !error_returned(answer) {
            return None;
        }
        let inner = answer.get(0).and_then(|first| first.get("error"))?;
        Some(
            serde_json::from_value::<Self>(inner.clone())
                .unwrap_or_else(|_| Self::unexpected_response(inner.clone())),
        )
    }
}

impl std::fmt::Display for BridgeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bridge error {}: {}", self.code, self.description)
    }
}

/// `true` iff `answer` is a non-empty list whose first element is an object
/// holding an `error` key.
pub fn error_returned(answer: &Value) -> bool {
    answer
        .as_array()
        .and_then(|items| items.first())
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("error"))
}

/// Outcome of one logical bridge request.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeResponse {
    /// Decoded JSON exactly as the bridge sent it (object or list).
    Ok(Value),
    /// Bridge-reported or synthesized failure.
    Fault(BridgeFault),
}

impl BridgeResponse {
    /// Classify a wire payload with [`error_returned`].
    pub fn from_wire(answer: Value) -> Self {
        match BridgeFault::from_wire(&answer) {
            Some(fault) => Self::Fault(fault),
            None => Self::Ok(answer),
        }
    }

    /// Back to the wire shape; faults become `[{"error": {...}}]`.
    pub fn into_wire(self) -> Value {
        match self {
            Self::Ok(value) => value,
            Self::Fault(fault) => fault.to_wire(),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    pub fn into_result(self) -> Result<Value, BridgeFault> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Fault(fault) => Err(fault),
        }
    }
}
