use thiserror::Error;

/// Failure of a single transport attempt against the bridge.
///
/// These never reach callers of [`BridgeClient::send`](crate::BridgeClient::send):
/// the fallback strategy folds them into a synthesized
/// [`BridgeFault`](crate::BridgeFault) with code 9999. They are public so the
/// individual attempts stay testable on their own.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Empty or whitespace-only bridge address.
    #[error("Invalid bridge address: {0:?}")]
    InvalidAddress(String),

    /// Plaintext request answered with a redirect (usually to HTTPS).
    #[error("redirect_to_https (HTTP {status})")]
    Redirect { status: u16 },

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The body was not JSON; `message` carries a preview of it.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String },
}

impl Error {
    /// Returns `true` if this is the redirect case of the plaintext attempt.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Render the error together with its `source()` chain on one line.
    ///
    /// reqwest hides the interesting part (refused, handshake failure, ...)
    /// in nested sources, so the plain `Display` output is not enough for
    /// the `connect_failed` description.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !out.contains(&text) {
                out.push_str(": ");
                out.push_str(&text);
            }
            source = cause.source();
        }
        out
    }
}
