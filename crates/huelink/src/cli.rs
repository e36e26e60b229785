//! Clap derive structures for the `huelink` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huelink -- control a local Hue bridge from the command line
#[derive(Debug, Parser)]
#[command(
    name = "huelink",
    version,
    about = "Control a local Philips Hue bridge from the command line",
    long_about = "Talks to a Hue bridge on the local network: pairs and keeps the\n\
        bridge username, lists rooms, zones, lights and scenes, and switches\n\
        or dims them. Every command prints an {\"ok\": ...} JSON envelope.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Bridge address (IP or host[:port]); overrides the config file
    #[arg(long, short = 'b', env = "HUELINK_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Path of the persisted state (username, favorites)
    #[arg(long, env = "HUELINK_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,

    /// Per-attempt bridge timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HUELINK_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON envelope (default)
    Json,
    /// Compact single-line JSON envelope
    JsonCompact,
    /// Human-readable table
    Table,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show pairing status and stored state
    Health,

    /// Manage the stored bridge username
    Username(UsernameArgs),

    /// Validate the stored username, pairing again if the bridge rejects it
    ///
    /// Press the link button on the bridge first when pairing from scratch.
    Pair,

    /// List rooms and zones with brightness summaries
    #[command(alias = "ls")]
    Rooms,

    /// List scenes
    Scenes,

    /// List the lights of one room
    Lights {
        /// Room (group) ID
        room: String,
    },

    /// Toggle a room's favorite mark
    #[command(alias = "fav")]
    Favorite {
        /// Room (group) ID
        room: String,
    },

    /// Set a light's brightness (1-254, clamped) and switch it on
    #[command(alias = "bri")]
    Brightness {
        /// Light ID
        light: String,
        /// Brightness; values outside 1-254 are clamped
        #[arg(allow_negative_numbers = true)]
        bri: i64,
    },

    /// Switch a light on if it is off, off if it is on
    Toggle {
        /// Light ID
        light: String,
    },

    /// Switch every light in a room on or off
    RoomPower {
        /// Room (group) ID
        room: String,
        /// "on" or "off"
        state: String,
    },

    /// Set a room's brightness (1-254, clamped) and switch it on
    RoomBrightness {
        /// Room (group) ID
        room: String,
        /// Brightness; values outside 1-254 are clamped
        #[arg(allow_negative_numbers = true)]
        bri: i64,
    },

    /// Recall a scene on a room
    Recall {
        /// Room (group) ID
        room: String,
        /// Scene ID
        scene: String,
    },

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Username ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsernameArgs {
    #[command(subcommand)]
    pub command: UsernameCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsernameCommand {
    /// Store a username obtained elsewhere
    Set {
        /// Bridge username
        username: String,
    },

    /// Forget the stored username
    Clear,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with defaults (and --bridge, if given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
