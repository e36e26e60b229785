//! Configuration for the huelink CLI.
//!
//! TOML file + `HUELINK_*` environment, platform paths for the config
//! and state files, and translation to `huelink_core::GatewayConfig`.
//! The CLI layers its flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use huelink_core::{DEFAULT_DEVICE_TYPE, GatewayConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default bridge address (e.g. "192.168.1.20").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<String>,

    /// Where the credential and favorites are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Per-attempt bridge timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Sent as `devicetype` when pairing.
    #[serde(default = "default_device_type")]
    pub device_type: String,

    /// Validate the bridge certificate on the TLS fallback. Bridges ship
    /// self-signed certificates, so this is off by default.
    #[serde(default)]
    pub verify_tls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bridge: None,
            state_file: None,
            timeout: default_timeout(),
            device_type: default_device_type(),
            verify_tls: false,
        }
    }
}

fn default_timeout() -> u64 {
    5
}
fn default_device_type() -> String {
    DEFAULT_DEVICE_TYPE.into()
}

impl Config {
    /// The configured state file, or the platform default.
    pub fn state_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(default_state_path)
    }

    /// Build a `GatewayConfig`, rejecting values the gateway can't use.
    pub fn to_gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        let device_type = self.device_type.trim();
        if device_type.is_empty() {
            return Err(ConfigError::Validation {
                field: "device_type".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(GatewayConfig {
            tls: if self.verify_tls {
                TlsVerification::SystemDefaults
            } else {
                TlsVerification::DangerAcceptInvalid
            },
            timeout: Duration::from_secs(self.timeout),
            device_type: device_type.to_owned(),
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "huelink", "huelink")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the persisted gateway state.
pub fn default_state_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("state.json"),
        |dirs| dirs.data_dir().join("state.json"),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("huelink");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUELINK_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.timeout, 5);
        assert_eq!(config.device_type, DEFAULT_DEVICE_TYPE);
        assert!(!config.verify_tls);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "bridge = \"10.0.0.2\"\ntimeout = 9\nstate_file = \"/tmp/hl.json\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.bridge.as_deref(), Some("10.0.0.2"));
        assert_eq!(config.timeout, 9);
        assert_eq!(config.state_path(), PathBuf::from("/tmp/hl.json"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            bridge: Some("hue.local".into()),
            verify_tls: true,
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn gateway_config_translation() {
        let gateway = Config::default().to_gateway_config().unwrap();
        assert_eq!(gateway.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(gateway.timeout, Duration::from_secs(5));

        let strict = Config {
            verify_tls: true,
            ..Config::default()
        };
        assert_eq!(
            strict.to_gateway_config().unwrap().tls,
            TlsVerification::SystemDefaults
        );
    }

    #[test]
    fn rejects_unusable_values() {
        let zero = Config {
            timeout: 0,
            ..Config::default()
        };
        assert!(matches!(
            zero.to_gateway_config(),
            Err(ConfigError::Validation { .. })
        ));

        let blank = Config {
            device_type: "  ".into(),
            ..Config::default()
        };
        assert!(blank.to_gateway_config().is_err());
    }
}
