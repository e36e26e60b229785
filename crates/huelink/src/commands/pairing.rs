//! Health, stored username and pairing.

use serde_json::json;

use huelink_core::Gateway;

use crate::cli::{GlobalOpts, UsernameArgs, UsernameCommand};
use crate::error::CliError;
use crate::output;

use super::emit;

pub async fn health(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    let health = gateway.health().await;
    emit(global, Ok(health), output::render_single)
}

pub async fn username(
    gateway: &Gateway,
    args: UsernameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsernameCommand::Set { username } => {
            let result = gateway.set_username(&username).await;
            emit(global, result, |format, username| {
                output::render_single(format, &json!({ "username": username }))
            })
        }
        UsernameCommand::Clear => {
            let result = gateway.clear_username().await;
            emit(global, result, |format, _| {
                output::render_single(format, &json!({}))
            })
        }
    }
}

/// Validate the stored username, or press for a new one.
pub async fn pair(gateway: &Gateway, bridge: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let result = gateway.ensure_paired(bridge).await;
    emit(global, result, |format, username| {
        output::render_single(format, &json!({ "paired": true, "username": username }))
    })
}
