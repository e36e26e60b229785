//! Room light listing and single-light writes.

use tabled::Tabled;

use huelink_core::{Gateway, Light, RoomLights};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::emit;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "On")]
    on: String,
    #[tabled(rename = "Bri")]
    bri: String,
    #[tabled(rename = "Reachable")]
    reachable: String,
}

impl From<&Light> for LightRow {
    fn from(l: &Light) -> Self {
        Self {
            id: l.id.clone(),
            name: l.name.clone(),
            on: if l.on { "on" } else { "off" }.into(),
            bri: l.bri.map(|b| b.to_string()).unwrap_or_default(),
            reachable: if l.reachable { "yes" } else { "no" }.into(),
        }
    }
}

fn render_room_lights(format: OutputFormat, data: &RoomLights) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let header = format!("{} ({})", data.room.name, data.room.id);
            let rows =
                output::render_list(format, "lights", &data.lights, |l| LightRow::from(l))?;
            Ok(format!("{header}\n{rows}"))
        }
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_single(format, data),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(
    gateway: &Gateway,
    bridge: &str,
    room: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.room_lights(bridge, room).await;
    emit(global, result, render_room_lights)
}

pub async fn brightness(
    gateway: &Gateway,
    bridge: &str,
    light: &str,
    bri: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.set_brightness(bridge, light, bri).await;
    emit(global, result, output::render_single)
}

pub async fn toggle(
    gateway: &Gateway,
    bridge: &str,
    light: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = gateway.toggle_light(bridge, light).await;
    emit(global, result, output::render_single)
}
