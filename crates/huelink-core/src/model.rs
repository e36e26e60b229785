// ── Domain types ──
//
// UI-facing summaries. All of them are recomputed on every request and
// serialize to the camelCase JSON the control surface returns.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Group kinds the gateway lists. Other bridge group types
/// (`LightGroup`, `Entertainment`, ...) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum RoomKind {
    Room,
    Zone,
}

/// Target power state for a whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Room or zone summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub favorite: bool,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    pub light_ids: Vec<String>,
    /// Mean brightness of reachable dimmable members, 1..=254.
    pub bri: u8,
    /// `bri` as a percentage, 1..=100.
    pub bri_pct: u8,
    pub any_on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub id: String,
    pub name: String,
    pub on: bool,
    pub bri: Option<i64>,
    pub reachable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub group: Option<String>,
    /// Always `"scene"`.
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRef {
    pub id: String,
    pub name: String,
}

/// A room together with its member lights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLights {
    pub room: RoomRef,
    pub lights: Vec<Light>,
}

// ── Write outcomes ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightBrightness {
    pub light_id: String,
    pub bri: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightPower {
    pub light_id: String,
    pub on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPower {
    pub room_id: String,
    pub on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomBrightness {
    pub room_id: String,
    pub bri: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecall {
    pub room_id: String,
    pub scene_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub room_id: String,
    pub favorite: bool,
}
