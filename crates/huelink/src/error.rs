//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use huelink_config::ConfigError;
use huelink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_PAIRED: i32 = 3;
    pub const UNREACHABLE: i32 = 7;
    pub const UPSTREAM: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Bridge ───────────────────────────────────────────────────────

    #[error("No bridge address configured")]
    #[diagnostic(
        code(huelink::no_bridge),
        help(
            "Pass --bridge <ip>, set HUELINK_BRIDGE, or add `bridge = \"<ip>\"` to\n\
             {path}"
        )
    )]
    NoBridge { path: String },

    #[error("Could not reach the bridge: {description}")]
    #[diagnostic(
        code(huelink::unreachable),
        help(
            "Check the bridge address and that it is on the same network.\n\
             Both http:// and https:// were tried."
        )
    )]
    BridgeUnreachable { description: String },

    #[error("Bridge returned an unexpected answer ({kind}): {description}")]
    #[diagnostic(code(huelink::upstream))]
    Upstream {
        kind: String,
        code: i64,
        description: String,
    },

    // ── Pairing ──────────────────────────────────────────────────────

    #[error("Not paired with the bridge")]
    #[diagnostic(
        code(huelink::not_paired),
        help(
            "Press the link button on the bridge, then run: huelink pair\n\
             Or store an existing username with: huelink username set <name>"
        )
    )]
    NotPaired,

    #[error("Pairing refused by the bridge ({code}): {description}")]
    #[diagnostic(
        code(huelink::pairing_failed),
        help("Press the link button on the bridge and run `huelink pair` within 30 seconds.")
    )]
    PairingFailed { code: i64, description: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(huelink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration / state ────────────────────────────────────────

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(huelink::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(huelink::config))]
    Config(Box<ConfigError>),

    #[error("Could not save state: {message}")]
    #[diagnostic(
        code(huelink::persistence),
        help("Check that the state file directory is writable, or pass --state-file.")
    )]
    Persistence { message: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(huelink::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(huelink::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoBridge { .. } | Self::Validation { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            Self::Config(err) if matches!(**err, ConfigError::Validation { .. }) => {
                exit_code::USAGE
            }
            Self::NotPaired | Self::PairingFailed { .. } => exit_code::NOT_PAIRED,
            Self::BridgeUnreachable { .. } => exit_code::UNREACHABLE,
            Self::Upstream { .. } => exit_code::UPSTREAM,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotPaired => CliError::NotPaired,

            CoreError::CallerInput { field, reason } => CliError::Validation { field, reason },

            CoreError::PairingFailed { fault } => CliError::PairingFailed {
                code: fault.code,
                description: fault.description,
            },

            CoreError::BridgeUnreachable { description } => {
                CliError::BridgeUnreachable { description }
            }

            CoreError::UpstreamInvalid {
                kind,
                code,
                description,
                raw: _,
            } => CliError::Upstream {
                kind: kind.into(),
                code,
                description,
            },

            CoreError::Persistence { message } => CliError::Persistence { message },
        }
    }
}
