// Resource endpoints
//
// Thin wrappers over `/api/{username}/...`. Reads return the tagged response
// untouched; shape checks belong to the caller, which knows what it asked for.

use serde_json::Value;

use crate::client::BridgeClient;
use crate::fault::BridgeResponse;
use crate::models::{GroupAction, LightStateUpdate};

impl BridgeClient {
    /// `GET /api/{username}/groups`
    pub async fn groups(&self, address: &str, username: &str) -> BridgeResponse {
        self.get(address, &format!("{username}/groups")).await
    }

    /// `GET /api/{username}/groups/{id}`
    pub async fn group(&self, address: &str, username: &str, group_id: &str) -> BridgeResponse {
        self.get(address, &format!("{username}/groups/{group_id}"))
            .await
    }

    /// `GET /api/{username}/lights`
    pub async fn lights(&self, address: &str, username: &str) -> BridgeResponse {
        self.get(address, &format!("{username}/lights")).await
    }

    /// `GET /api/{username}/lights/{id}`
    pub async fn light(&self, address: &str, username: &str, light_id: &str) -> BridgeResponse {
        self.get(address, &format!("{username}/lights/{light_id}"))
            .await
    }

    /// `GET /api/{username}/scenes`
    pub async fn scenes(&self, address: &str, username: &str) -> BridgeResponse {
        self.get(address, &format!("{username}/scenes")).await
    }

    /// `PUT /api/{username}/lights/{id}/state`
    pub async fn set_light_state(
        &self,
        address: &str,
        username: &str,
        light_id: &str,
        update: &LightStateUpdate,
    ) -> BridgeResponse {
        self.put(
            address,
            &format!("{username}/lights/{light_id}/state"),
            &to_body(update),
        )
        .await
    }

    /// `PUT /api/{username}/groups/{id}/action`
    pub async fn set_group_action(
        &self,
        address: &str,
        username: &str,
        group_id: &str,
        action: &GroupAction,
    ) -> BridgeResponse {
        self.put(
            address,
            &format!("{username}/groups/{group_id}/action"),
            &to_body(action),
        )
        .await
    }
}

fn to_body(body: &impl serde::Serialize) -> Value {
    // Plain structs of bools, ints and strings always serialize.
    serde_json::to_value(body).unwrap_or(Value::Null)
}
