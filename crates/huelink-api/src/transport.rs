// Shared transport configuration for building reqwest::Client instances.
//
// A bridge call is tried over plaintext first and over TLS second. The two
// attempts need differently configured clients: plaintext must not follow
// redirects (a redirect means "use HTTPS"), and the TLS client has to accept
// the self-signed certificates bridges ship with.

use std::time::Duration;

use reqwest::redirect::Policy;
use url::Url;

use crate::error::Error;

/// Per-attempt timeout used by the bridge protocol.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("huelink/", env!("CARGO_PKG_VERSION"));

/// Certificate policy for the TLS fallback attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Accept any certificate. Bridges serve self-signed certificates on the
    /// local network, so this is the default; it is security-relevant and
    /// only ever applies to the fallback attempt.
    #[default]
    DangerAcceptInvalid,
}

/// Which leg of the fallback strategy a request goes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Build the bridge API URL: `{scheme}://{address}/api[/{path}]`.
///
/// Leading slashes on `path` are ignored, and an empty path addresses the
/// API root (used for pairing).
pub fn api_url(scheme: Scheme, address: &str, path: &str) -> Result<Url, Error> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::InvalidAddress(address.to_owned()));
    }
    let path = path.trim_start_matches('/');
    let full = if path.is_empty() {
        format!("{}://{address}/api", scheme.as_str())
    } else {
        format!("{}://{address}/api/{path}", scheme.as_str())
    };
    Ok(Url::parse(&full)?)
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Client for the plaintext attempt: redirects are returned, not followed.
    pub fn build_plain_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    /// Client for the TLS attempt, honouring [`TlsMode`].
    pub fn build_secure_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match self.tls {
            TlsMode::System => {}
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTPS client: {e}")))
    }
}
