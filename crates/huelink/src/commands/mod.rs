//! Command dispatch: CLI args -> gateway operations -> output formatting.

pub mod config_cmd;
pub mod lights;
pub mod pairing;
pub mod rooms;
pub mod scenes;

use huelink_core::{CoreError, Gateway};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    gateway: &Gateway,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Health => pairing::health(gateway, global).await,
        Command::Username(args) => pairing::username(gateway, args, global).await,
        Command::Favorite { room } => rooms::favorite(gateway, &room, global).await,

        Command::Pair => pairing::pair(gateway, config::bridge_address(cfg)?, global).await,
        Command::Rooms => rooms::list(gateway, config::bridge_address(cfg)?, global).await,
        Command::Scenes => scenes::list(gateway, config::bridge_address(cfg)?, global).await,
        Command::Lights { room } => {
            lights::list(gateway, config::bridge_address(cfg)?, &room, global).await
        }
        Command::Brightness { light, bri } => {
            lights::brightness(gateway, config::bridge_address(cfg)?, &light, bri, global).await
        }
        Command::Toggle { light } => {
            lights::toggle(gateway, config::bridge_address(cfg)?, &light, global).await
        }
        Command::RoomPower { room, state } => {
            rooms::power(gateway, config::bridge_address(cfg)?, &room, &state, global).await
        }
        Command::RoomBrightness { room, bri } => {
            rooms::brightness(gateway, config::bridge_address(cfg)?, &room, bri, global).await
        }
        Command::Recall { room, scene } => {
            rooms::recall(gateway, config::bridge_address(cfg)?, &room, &scene, global).await
        }

        // Config and Completions are handled before a gateway exists
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled without a gateway".into(),
        }),
    }
}

/// Print a gateway result: rendered payload on success, failure envelope
/// plus a diagnostic on error.
fn emit<T>(
    global: &GlobalOpts,
    result: Result<T, CoreError>,
    render: impl FnOnce(OutputFormat, &T) -> Result<String, CliError>,
) -> Result<(), CliError> {
    match result {
        Ok(data) => {
            let out = render(global.output, &data)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        Err(err) => {
            output::print_failure(global.output, &err);
            Err(err.into())
        }
    }
}
