// ── Resource aggregation ──
//
// Turns raw bridge maps into UI summaries. Nothing is cached: every call
// fetches fresh groups/lights/scenes, at most two round-trips per read.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use huelink_api::{
    BridgeClient, BridgeResponse, GroupAction, GroupRecord, LightRecord, LightStateUpdate,
    SceneRecord,
};

use crate::brightness;
use crate::error::CoreError;
use crate::favorites::{FavoriteSet, FavoritesStore};
use crate::model::{
    Light, LightBrightness, LightPower, PowerState, Room, RoomBrightness, RoomKind, RoomLights,
    RoomPower, RoomRef, Scene, SceneRecall,
};

pub struct ResourceAggregator {
    client: Arc<BridgeClient>,
    favorites: Arc<FavoritesStore>,
}

impl ResourceAggregator {
    pub fn new(client: Arc<BridgeClient>, favorites: Arc<FavoritesStore>) -> Self {
        Self { client, favorites }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// All rooms and zones with brightness summaries, sorted by name.
    pub async fn list_rooms(&self, address: &str, username: &str) -> Result<Vec<Room>, CoreError> {
        let groups = expect_object(self.client.groups(address, username).await, "groups_invalid")?;
        let lights = expect_object(self.client.lights(address, username).await, "lights_invalid")?;
        let favorites = self.favorites.snapshot().await;

        let mut rooms: Vec<Room> = groups
            .iter()
            .filter_map(|(id, group)| summarize_room(id, group, &lights, &favorites))
            .collect();
        // Stable, so equal names keep the bridge's order.
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = rooms.len(), "rooms listed");
        Ok(rooms)
    }

    /// All scenes, sorted by name.
    pub async fn list_scenes(
        &self,
        address: &str,
        username: &str,
    ) -> Result<Vec<Scene>, CoreError> {
        let scenes = expect_object(self.client.scenes(address, username).await, "scenes_invalid")?;

        let mut out: Vec<Scene> = scenes
            .iter()
            .filter_map(|(id, raw)| {
                let scene = SceneRecord::from_value(raw)?;
                Some(Scene {
                    id: id.clone(),
                    name: scene.name.unwrap_or_else(|| format!("Scene {id}")),
                    group: scene.group,
                    kind: "scene".into(),
                })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// One room and its member lights, sorted by name.
    pub async fn list_room_lights(
        &self,
        address: &str,
        username: &str,
        room_id: &str,
    ) -> Result<RoomLights, CoreError> {
        let raw_group = expect_object(
            self.client.group(address, username, room_id).await,
            "group_invalid",
        )?;
        let group = GroupRecord::from_value(&Value::Object(raw_group)).unwrap_or_default();
        let lights = expect_object(self.client.lights(address, username).await, "lights_invalid")?;

        let mut members: Vec<Light> = group
            .lights
            .iter()
            .filter_map(|id| {
                let light = LightRecord::from_value(lights.get(id)?)?;
                Some(Light {
                    id: id.clone(),
                    name: light.name.unwrap_or_else(|| format!("Light {id}")),
                    on: light.state.on,
                    bri: light.state.bri_exact(),
                    reachable: !light.state.is_unreachable(),
                })
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(RoomLights {
            room: RoomRef {
                id: room_id.to_owned(),
                name: group.name.unwrap_or_else(|| format!("Room {room_id}")),
            },
            lights: members,
        })
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Set a light's brightness (clamped) and switch it on.
    pub async fn set_brightness(
        &self,
        address: &str,
        username: &str,
        light_id: &str,
        bri: i64,
    ) -> Result<LightBrightness, CoreError> {
        let bri = brightness::clamp(bri);
        let update = LightStateUpdate {
            on: Some(true),
            bri: Some(bri),
        };
        expect_write(
            self.client.set_light_state(address, username, light_id, &update).await,
        )?;
        Ok(LightBrightness {
            light_id: light_id.to_owned(),
            bri,
        })
    }

    /// Invert a light's on/off state.
    ///
    /// The bridge has no toggle primitive: read the state, write the inverse.
    pub async fn toggle_light(
        &self,
        address: &str,
        username: &str,
        light_id: &str,
    ) -> Result<LightPower, CoreError> {
        let raw = expect_object(
            self.client.light(address, username, light_id).await,
            "light_invalid",
        )?;
        let current = LightRecord::from_value(&Value::Object(raw))
            .unwrap_or_default()
            .state
            .on;
        let next = !current;

        let update = LightStateUpdate {
            on: Some(next),
            bri: None,
        };
        expect_write(
            self.client.set_light_state(address, username, light_id, &update).await,
        )?;
        Ok(LightPower {
            light_id: light_id.to_owned(),
            on: next,
        })
    }

    /// Switch every light of a room on or off.
    pub async fn set_room_all(
        &self,
        address: &str,
        username: &str,
        room_id: &str,
        power: PowerState,
    ) -> Result<RoomPower, CoreError> {
        let action = GroupAction {
            on: Some(power.is_on()),
            ..GroupAction::default()
        };
        expect_write(
            self.client.set_group_action(address, username, room_id, &action).await,
        )?;
        Ok(RoomPower {
            room_id: room_id.to_owned(),
            on: power.is_on(),
        })
    }

    /// Set a room's brightness (clamped) and switch it on.
    pub async fn set_room_brightness(
        &self,
        address: &str,
        username: &str,
        room_id: &str,
        bri: i64,
    ) -> Result<RoomBrightness, CoreError> {
        let bri = brightness::clamp(bri);
        let action = GroupAction {
            on: Some(true),
            bri: Some(bri),
            scene: None,
        };
        expect_write(
            self.client.set_group_action(address, username, room_id, &action).await,
        )?;
        Ok(RoomBrightness {
            room_id: room_id.to_owned(),
            bri,
        })
    }

    /// Recall a scene on a room.
    pub async fn recall_scene(
        &self,
        address: &str,
        username: &str,
        room_id: &str,
        scene_id: &str,
    ) -> Result<SceneRecall, CoreError> {
        let action = GroupAction {
            scene: Some(scene_id.to_owned()),
            ..GroupAction::default()
        };
        expect_write(
            self.client.set_group_action(address, username, room_id, &action).await,
        )?;
        Ok(SceneRecall {
            room_id: room_id.to_owned(),
            scene_id: scene_id.to_owned(),
        })
    }
}

// ── Summaries ────────────────────────────────────────────────────────

/// Summarize one group entry; `None` unless it is a `Room` or `Zone` object.
///
/// Lights that are explicitly unreachable, or missing from `lights`, do not
/// count towards `any_on` or the brightness average.
pub fn summarize_room(
    id: &str,
    raw_group: &Value,
    lights: &Map<String, Value>,
    favorites: &FavoriteSet,
) -> Option<Room> {
    let group = GroupRecord::from_value(raw_group)?;
    let kind = RoomKind::from_str(group.kind.as_deref()?).ok()?;

    let mut any_on = false;
    let mut samples = Vec::new();
    for light_id in &group.lights {
        let Some(light) = lights.get(light_id).and_then(LightRecord::from_value) else {
            continue;
        };
        if light.state.is_unreachable() {
            continue;
        }
        any_on |= light.state.on;
        samples.extend(light.state.bri_sample());
    }

    let bri = brightness::average(&samples);
    Some(Room {
        id: id.to_owned(),
        name: group.name.unwrap_or_else(|| format!("Room {id}")),
        favorite: favorites.contains(id),
        kind,
        light_ids: group.lights,
        bri,
        bri_pct: brightness::to_percent(bri),
        any_on,
    })
}

fn expect_object(
    response: BridgeResponse,
    kind: &'static str,
) -> Result<Map<String, Value>, CoreError> {
    match response {
        BridgeResponse::Ok(Value::Object(map)) => Ok(map),
        BridgeResponse::Ok(other) => Err(CoreError::unexpected_shape(kind, other)),
        BridgeResponse::Fault(fault) => Err(CoreError::from_fault(kind, fault)),
    }
}

fn expect_write(response: BridgeResponse) -> Result<(), CoreError> {
    match response {
        BridgeResponse::Ok(_) => Ok(()),
        BridgeResponse::Fault(fault) => Err(CoreError::from_fault("bridge_error", fault)),
    }
}
