//! Room listing, favorites and room-wide writes.

use tabled::Tabled;

use huelink_core::{Gateway, Room};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::emit;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Fav")]
    favorite: String,
    #[tabled(rename = "On")]
    on: String,
    #[tabled(rename = "Bri")]
    bri: String,
    #[tabled(rename = "Lights")]
    lights: usize,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            kind: r.kind.to_string(),
            favorite: if r.favorite { "★" } else { "" }.into(),
            on: if r.any_on { "on" } else { "off" }.into(),
            bri: format!("{}%", r.bri_pct),
            lights: r.light_ids.len(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(gateway: &Gateway, bridge: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let result = gateway.rooms(bridge).await;
    emit(global, result, |format, rooms| {
        output::render_list(format, "rooms", rooms, |r| RoomRow::from(r))
    })
}

pub async fn favorite(gateway: &Gateway, room: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let result = gateway.toggle_favorite(room).await;
    emit(global, result, output::render_single)
}

pub async fn power(
    gateway: &Gateway,
    bridge: &str,
    room: &str,
    state: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.set_room_all(bridge, room, state).await;
    emit(global, result, output::render_single)
}

pub async fn brightness(
    gateway: &Gateway,
    bridge: &str,
    room: &str,
    bri: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.set_room_brightness(bridge, room, bri).await;
    emit(global, result, output::render_single)
}

pub async fn recall(
    gateway: &Gateway,
    bridge: &str,
    room: &str,
    scene: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.recall_scene(bridge, room, scene).await;
    emit(global, result, output::render_single)
}
