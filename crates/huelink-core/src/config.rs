// ── Gateway configuration ──

use std::time::Duration;

use huelink_api::transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};

/// Device identification sent when requesting a username.
pub const DEFAULT_DEVICE_TYPE: &str = "huelink#gateway";

/// Certificate policy for the TLS fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// Validate against the system roots. Most bridges will fail this.
    SystemDefaults,
    /// Accept self-signed bridge certificates (default).
    #[default]
    DangerAcceptInvalid,
}

/// Settings the gateway needs at construction time.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub tls: TlsVerification,
    /// Per-attempt timeout; one call may take two of these.
    pub timeout: Duration,
    pub device_type: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            device_type: DEFAULT_DEVICE_TYPE.into(),
        }
    }
}

impl GatewayConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
