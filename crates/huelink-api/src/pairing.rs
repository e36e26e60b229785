// Pairing endpoints
//
// `POST /api` creates a username once the link button has been pressed;
// `GET /api/{username}` is the cheapest authenticated call and doubles as a
// credential check.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::BridgeClient;
use crate::fault::{BridgeFault, BridgeResponse};

impl BridgeClient {
    /// Authenticated check: `GET /api/{username}`.
    pub async fn check_username(&self, address: &str, username: &str) -> BridgeResponse {
        debug!("checking stored username");
        self.get(address, username).await
    }

    /// Request a new username: `POST /api` with `{"devicetype": ...}`.
    ///
    /// Succeeds only on `[{"success": {"username": "..."}}]`. A bridge fault
    /// is passed through; any other answer is a 9998 fault carrying the raw
    /// payload.
    pub async fn create_username(
        &self,
        address: &str,
        device_type: &str,
    ) -> Result<String, BridgeFault> {
        debug!(device_type, "requesting new username");
        let answer = self
            .post(address, "", &json!({ "devicetype": device_type }))
            .await
            .into_result()?;
        parse_created_username(&answer).ok_or_else(|| BridgeFault::unexpected_response(answer))
    }
}

/// Pull `success.username` out of the first element of a pairing answer.
pub fn parse_created_username(answer: &Value) -> Option<String> {
    answer
        .as_array()?
        .first()?
        .get("success")?
        .get("username")?
        .as_str()
        .map(String::from)
}
