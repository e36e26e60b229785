// ── Core error types ──
//
// The gateway's failure taxonomy. Bridge faults arrive as `BridgeFault`
// values (never as transport errors); `CoreError::from_fault` sorts them
// into "could not reach the bridge" and "bridge said no / said nonsense".

use serde_json::{Value, json};
use thiserror::Error;

use huelink_api::BridgeFault;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Caller errors ────────────────────────────────────────────────
    #[error("not paired (no username stored)")]
    NotPaired,

    #[error("invalid {field}: {reason}")]
    CallerInput { field: String, reason: String },

    #[error("pairing rejected by bridge: {fault}")]
    PairingFailed { fault: BridgeFault },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("bridge unreachable: {description}")]
    BridgeUnreachable { description: String },

    #[error("{kind}: bridge error {code}: {description}")]
    UpstreamInvalid {
        /// Which answer was wrong, e.g. `groups_invalid`.
        kind: &'static str,
        code: i64,
        description: String,
        raw: Option<Value>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("state persistence failed: {message}")]
    Persistence { message: String },
}

impl CoreError {
    pub fn caller_input(field: &str, reason: impl Into<String>) -> Self {
        Self::CallerInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Sort a bridge fault: 9999 means unreachable, anything else is the
    /// bridge rejecting or garbling the `kind` request.
    pub fn from_fault(kind: &'static str, fault: BridgeFault) -> Self {
        if fault.is_connect_failure() {
            return Self::BridgeUnreachable {
                description: fault.description,
            };
        }
        Self::UpstreamInvalid {
            kind,
            code: fault.code,
            description: fault.description,
            raw: fault.raw,
        }
    }

    /// The bridge answered, but not with the object we asked for.
    pub fn unexpected_shape(kind: &'static str, raw: Value) -> Self {
        Self::UpstreamInvalid {
            kind,
            code: huelink_api::UNEXPECTED_RESPONSE,
            description: "unexpected_response".into(),
            raw: Some(raw),
        }
    }

    /// Stable machine-readable code for the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotPaired => "not_paired",
            Self::CallerInput { .. } => "invalid_input",
            Self::PairingFailed { .. } => "pairing_failed",
            Self::BridgeUnreachable { .. } => "bridge_unreachable",
            Self::UpstreamInvalid { kind, .. } => *kind,
            Self::Persistence { .. } => "persistence_failed",
        }
    }

    /// HTTP status a control surface should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotPaired | Self::CallerInput { .. } | Self::PairingFailed { .. } => 400,
            Self::BridgeUnreachable { .. } | Self::UpstreamInvalid { .. } => 502,
            Self::Persistence { .. } => 500,
        }
    }

    /// The failure envelope: `{"ok": false, "error": ...}`.
    ///
    /// Bridge-originated failures carry the `{type, description}` object so
    /// clients can tell a 101 (link button) from a 9999 (unreachable).
    pub fn to_body(&self) -> Value {
        match self {
            Self::CallerInput { field, reason } => json!({
                "ok": false,
                "error": reason,
                "field": field,
            }),
            Self::PairingFailed { fault } => json!({
                "ok": false,
                "paired": false,
                "error": fault,
            }),
            Self::BridgeUnreachable { description } => json!({
                "ok": false,
                "error": {
                    "type": huelink_api::CONNECT_FAILED,
                    "description": description,
                },
            }),
            Self::UpstreamInvalid {
                kind,
                code,
                description,
                raw,
            } => json!({
                "ok": false,
                "error": kind,
                "detail": { "type": code, "description": description },
                "raw": raw,
            }),
            other => json!({
                "ok": false,
                "error": other.code(),
                "message": other.to_string(),
            }),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_failure_is_unreachable() {
        let err = CoreError::from_fault(
            "groups_invalid",
            BridgeFault::new(huelink_api::CONNECT_FAILED, "connect_failed: refused"),
        );
        assert!(matches!(err, CoreError::BridgeUnreachable { .. }));
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn native_fault_is_upstream_invalid() {
        let err = CoreError::from_fault("lights_invalid", BridgeFault::new(1, "unauthorized user"));
        assert_eq!(err.code(), "lights_invalid");
        assert_eq!(err.http_status(), 502);
        assert_eq!(err.to_body()["detail"]["type"], json!(1));
    }

    #[test]
    fn caller_errors_are_400() {
        assert_eq!(CoreError::NotPaired.http_status(), 400);
        assert_eq!(CoreError::caller_input("bridge", "missing").http_status(), 400);
        assert_eq!(CoreError::NotPaired.to_body()["ok"], json!(false));
    }

    #[test]
    fn caller_input_reports_reason() {
        let body = CoreError::caller_input("state", "invalid_state").to_body();
        assert_eq!(body, json!({ "ok": false, "error": "invalid_state", "field": "state" }));
    }
}
