// Bridge HTTP client
//
// One logical request = a plaintext attempt, then exactly one TLS attempt if
// the first did not complete. Both attempts are plain methods so each leg can
// be exercised on its own; `send` only composes them.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::fault::{BridgeFault, BridgeResponse};
use crate::transport::{Scheme, TransportConfig, api_url};

/// Raw client for the bridge's `/api` tree.
///
/// Holds no per-bridge state: the address is supplied on every call, so a
/// single instance can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    plain: reqwest::Client,
    secure: reqwest::Client,
}

impl BridgeClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            plain: transport.build_plain_client()?,
            secure: transport.build_secure_client()?,
        })
    }

    // ── Strategy ─────────────────────────────────────────────────────

    /// Perform one logical request and classify the answer.
    pub async fn send(
        &self,
        address: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> BridgeResponse {
        BridgeResponse::from_wire(self.send_raw(address, method, path, body).await)
    }

    /// Perform one logical request and return the wire payload.
    ///
    /// Never fails: if neither attempt completes, the result is the
    /// synthesized `[{"error": {"type": 9999, ...}}]` payload.
    pub async fn send_raw(
        &self,
        address: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Value {
        match self
            .attempt(Scheme::Http, address, method.clone(), path, body)
            .await
        {
            Ok(answer) => return answer,
            Err(e) => debug!(error = %e, "plaintext attempt failed, retrying over https"),
        }

        match self.attempt(Scheme::Https, address, method, path, body).await {
            Ok(answer) => answer,
            Err(e) => {
                let fault = BridgeFault::connect_failed(&e);
                warn!(address, description = %fault.description, "bridge unreachable");
                fault.to_wire()
            }
        }
    }

    /// A single attempt over the given scheme.
    ///
    /// Plaintext redirects (301/302/307/308) and non-JSON bodies are errors.
    /// Any other status with a JSON body is returned as-is: the bridge puts
    /// its own errors in the body.
    pub async fn attempt(
        &self,
        scheme: Scheme,
        address: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = api_url(scheme, address, path)?;
        debug!("{} {}", method, url);

        let http = match scheme {
            Scheme::Http => &self.plain,
            Scheme::Https => &self.secure,
        };
        let mut builder = http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;

        let status = resp.status();
        if scheme == Scheme::Http && is_redirect(status) {
            return Err(Error::Redirect { status: status.as_u16() });
        }

        let text = resp.text().await?;
        trace!(%status, bytes = text.len(), "bridge answered");
        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&text)),
        })
    }

    // ── Verb helpers ─────────────────────────────────────────────────

    pub async fn get(&self, address: &str, path: &str) -> BridgeResponse {
        self.send(address, Method::GET, path, None).await
    }

    pub async fn put(&self, address: &str, path: &str, body: &Value) -> BridgeResponse {
        self.send(address, Method::PUT, path, Some(body)).await
    }

    pub async fn post(&self, address: &str, path: &str, body: &Value) -> BridgeResponse {
        self.send(address, Method::POST, path, Some(body)).await
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
