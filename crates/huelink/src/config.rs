//! CLI configuration: `huelink_config` plus `GlobalOpts` overrides.

use std::sync::Arc;

use huelink_core::{Gateway, JsonFileStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use huelink_config::{Config, config_path, load_config, save_config};

/// Load the config file and apply flag overrides (flag > env > file).
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    if let Some(ref bridge) = global.bridge {
        cfg.bridge = Some(bridge.clone());
    }
    if let Some(ref path) = global.state_file {
        cfg.state_file = Some(path.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

/// The bridge address, or a usage error pointing at the config file.
pub fn bridge_address(cfg: &Config) -> Result<&str, CliError> {
    cfg.bridge
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| CliError::NoBridge {
            path: config_path().display().to_string(),
        })
}

/// Build the gateway over the state file the config points at.
pub async fn build_gateway(cfg: &Config) -> Result<Gateway, CliError> {
    let gateway_config = cfg.to_gateway_config()?;
    let store = JsonFileStore::new(cfg.state_path());
    tracing::debug!(state_file = %store.path().display(), "using state file");
    Ok(Gateway::new(gateway_config, Arc::new(store)).await?)
}
