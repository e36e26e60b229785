// ── Gateway facade ──
//
// The single service instance a control surface talks to. It owns the
// persisted state and wires the pairing, favorites and aggregation
// components together; each operation validates caller input, resolves
// the credential, and delegates.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use huelink_api::BridgeClient;

use crate::aggregate::ResourceAggregator;
use crate::config::GatewayConfig;
use crate::error::CoreError;
use crate::favorites::FavoritesStore;
use crate::model::{
    FavoriteToggle, LightBrightness, LightPower, PowerState, Room, RoomBrightness, RoomLights,
    RoomPower, Scene, SceneRecall,
};
use crate::pairing::{PairingManager, PairingState};
use crate::state::{SharedState, StateStore};

/// Answer of the health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub paired: bool,
    pub pairing_state: PairingState,
    pub username: Option<String>,
    pub updated_at: Option<i64>,
}

/// Cheaply cloneable handle to the gateway.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    config: GatewayConfig,
    state: Arc<SharedState>,
    pairing: PairingManager,
    favorites: Arc<FavoritesStore>,
    resources: ResourceAggregator,
}

impl Gateway {
    /// Build the gateway and load state from `store`.
    pub async fn new(config: GatewayConfig, store: Arc<dyn StateStore>) -> Result<Self, CoreError> {
        let client = BridgeClient::new(&config.transport()).map_err(|e| {
            CoreError::BridgeUnreachable {
                description: e.chain(),
            }
        })?;
        Ok(Self::with_client(config, client, store).await)
    }

    /// Build the gateway around an existing bridge client.
    pub async fn with_client(
        config: GatewayConfig,
        client: BridgeClient,
        store: Arc<dyn StateStore>,
    ) -> Self {
        let client = Arc::new(client);
        let state = Arc::new(SharedState::load(store));
        let favorites = Arc::new(FavoritesStore::new(Arc::clone(&state)));
        let pairing =
            PairingManager::new(Arc::clone(&client), Arc::clone(&state), config.device_type.clone())
                .await;
        let resources = ResourceAggregator::new(client, Arc::clone(&favorites));
        Self {
            inner: Arc::new(GatewayInner {
                config,
                state,
                pairing,
                favorites,
                resources,
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    pub fn pairing(&self) -> &PairingManager {
        &self.inner.pairing
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.inner.favorites
    }

    pub fn subscribe_pairing(&self) -> watch::Receiver<PairingState> {
        self.inner.pairing.subscribe()
    }

    // ── Local operations ─────────────────────────────────────────────

    pub async fn health(&self) -> Health {
        let snapshot = self.inner.state.snapshot().await;
        let username = snapshot.username().map(String::from);
        Health {
            paired: username.is_some(),
            pairing_state: self.inner.pairing.pairing_state(),
            username,
            updated_at: snapshot.updated_at,
        }
    }

    pub async fn set_username(&self, username: &str) -> Result<String, CoreError> {
        self.inner.pairing.set_username(username).await
    }

    pub async fn clear_username(&self) -> Result<(), CoreError> {
        self.inner.pairing.clear().await
    }

    pub async fn toggle_favorite(&self, room_id: &str) -> Result<FavoriteToggle, CoreError> {
        let room_id = required("roomId", room_id)?;
        let favorite = self.inner.favorites.toggle(room_id).await?;
        Ok(FavoriteToggle {
            room_id: room_id.to_owned(),
            favorite,
        })
    }

    // ── Bridge operations ────────────────────────────────────────────

    pub async fn ensure_paired(&self, address: &str) -> Result<String, CoreError> {
        let address = bridge_address(address)?;
        self.inner.pairing.ensure_paired(address).await
    }

    pub async fn rooms(&self, address: &str) -> Result<Vec<Room>, CoreError> {
        let (address, username) = self.authorize(address).await?;
        self.inner.resources.list_rooms(address, &username).await
    }

    pub async fn scenes(&self, address: &str) -> Result<Vec<Scene>, CoreError> {
        let (address, username) = self.authorize(address).await?;
        self.inner.resources.list_scenes(address, &username).await
    }

    pub async fn room_lights(&self, address: &str, room_id: &str) -> Result<RoomLights, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let room_id = required("roomId", room_id)?;
        self.inner
            .resources
            .list_room_lights(address, &username, room_id)
            .await
    }

    pub async fn set_brightness(
        &self,
        address: &str,
        light_id: &str,
        bri: i64,
    ) -> Result<LightBrightness, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let light_id = required("lightId", light_id)?;
        self.inner
            .resources
            .set_brightness(address, &username, light_id, bri)
            .await
    }

    pub async fn toggle_light(
        &self,
        address: &str,
        light_id: &str,
    ) -> Result<LightPower, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let light_id = required("lightId", light_id)?;
        self.inner
            .resources
            .toggle_light(address, &username, light_id)
            .await
    }

    /// `state` must be `on` or `off`.
    pub async fn set_room_all(
        &self,
        address: &str,
        room_id: &str,
        state: &str,
    ) -> Result<RoomPower, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let room_id = required("roomId", room_id)?;
        let power = PowerState::from_str(state)
            .map_err(|_| CoreError::caller_input("state", "invalid_state"))?;
        self.inner
            .resources
            .set_room_all(address, &username, room_id, power)
            .await
    }

    pub async fn set_room_brightness(
        &self,
        address: &str,
        room_id: &str,
        bri: i64,
    ) -> Result<RoomBrightness, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let room_id = required("roomId", room_id)?;
        self.inner
            .resources
            .set_room_brightness(address, &username, room_id, bri)
            .await
    }

    pub async fn recall_scene(
        &self,
        address: &str,
        room_id: &str,
        scene_id: &str,
    ) -> Result<SceneRecall, CoreError> {
        let (address, username) = self.authorize(address).await?;
        let room_id = required("roomId", room_id)?;
        let scene_id = required("sceneId", scene_id)?;
        self.inner
            .resources
            .recall_scene(address, &username, room_id, scene_id)
            .await
    }

    /// Address check first, then the stored credential.
    async fn authorize<'a>(&self, address: &'a str) -> Result<(&'a str, String), CoreError> {
        let address = bridge_address(address)?;
        let username = self.inner.pairing.require().await?;
        Ok((address, username))
    }
}

fn bridge_address(raw: &str) -> Result<&str, CoreError> {
    required("bridgeIp", raw)
}

fn required<'a>(field: &str, raw: &'a str) -> Result<&'a str, CoreError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CoreError::caller_input(field, format!("{field} missing")));
    }
    Ok(value)
}
