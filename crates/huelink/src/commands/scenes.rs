//! Scene listing.

use tabled::Tabled;

use huelink_core::{Gateway, Scene};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::emit;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SceneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    group: String,
}

impl From<&Scene> for SceneRow {
    fn from(s: &Scene) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            group: s.group.clone().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn list(gateway: &Gateway, bridge: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let result = gateway.scenes(bridge).await;
    emit(global, result, |format, scenes| {
        output::render_list(format, "scenes", scenes, |s| SceneRow::from(s))
    })
}
