//! Clap derive structures for the `lumen` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// lumen -- port view and control for optical network devices
#[derive(Debug, Parser)]
#[command(
    name = "lumen",
    version,
    about = "Inspect and control optical device ports from the command line",
    long_about = "Per-port view of optical network devices (frequency limits, power,\n\
        modulation, protection state) and validated commands to change them.\n\n\
        `lumen serve` speaks the JSON message protocol over stdin/stdout.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "LUMEN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Inventory file (overrides profile)
    #[arg(long, short = 'i', env = "LUMEN_INVENTORY", global = true)]
    pub inventory: Option<PathBuf>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "LUMEN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: `defaults.color` from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    /// The selected output format. Config defaults are filled in before dispatch.
    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.unwrap_or_default()
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    #[default]
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the port table of a device
    #[command(alias = "p")]
    Ports(DeviceArgs),

    /// Show which port columns and protection operations apply to a device
    Items(DeviceArgs),

    /// Set or sync port target power
    #[command(alias = "pw")]
    Power(PowerArgs),

    /// Set port modulation
    #[command(alias = "mod")]
    Modulation(ModulationArgs),

    /// Tune a port to a frequency
    #[command(alias = "freq")]
    Frequency(FrequencyArgs),

    /// Change protection switching mode
    #[command(alias = "ops")]
    Protection(ProtectionArgs),

    /// Serve JSON request envelopes on stdin, one per line
    Serve,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device identifier
    pub device: String,
}

#[derive(Debug, Args)]
pub struct PortArgs {
    /// Device identifier
    pub device: String,

    /// Port number
    pub port: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POWER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PowerArgs {
    #[command(subcommand)]
    pub command: PowerCommand,
}

#[derive(Debug, Subcommand)]
pub enum PowerCommand {
    /// Set the target power of a port, in dBm
    Set {
        #[command(flatten)]
        port: PortArgs,

        /// Target power in dBm
        #[arg(allow_negative_numbers = true)]
        dbm: f64,
    },

    /// Re-read the target power from the device
    Sync {
        #[command(flatten)]
        port: PortArgs,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MODULATION / FREQUENCY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ModulationArgs {
    #[command(subcommand)]
    pub command: ModulationCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModulationCommand {
    /// Set the modulation scheme of a line port
    Set {
        #[command(flatten)]
        port: PortArgs,

        /// Modulation scheme (e.g. DP_QPSK, DP_8QAM, DP_16QAM)
        scheme: String,
    },
}

#[derive(Debug, Args)]
pub struct FrequencyArgs {
    #[command(subcommand)]
    pub command: FrequencyCommand,
}

#[derive(Debug, Subcommand)]
pub enum FrequencyCommand {
    /// Create a connection on the port at the given frequency
    Set {
        #[command(flatten)]
        port: PortArgs,

        /// Frequency in THz (e.g. 193.1)
        thz: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROTECTION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProtectionArgs {
    #[command(subcommand)]
    pub command: ProtectionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProtectionCommand {
    /// List the switching operations of a device
    #[command(alias = "ls")]
    List(DeviceArgs),

    /// Apply a switching operation
    Set {
        /// Device identifier
        device: String,

        /// Operation: AUTOMATIC, FORCE or MANUAL
        operation: String,

        /// Path index within the group (ignored for AUTOMATIC)
        #[arg(long, default_value = "-1", allow_negative_numbers = true)]
        index: i32,

        /// Protection group as <device>/<port> (defaults to the first group)
        #[arg(long, short = 'g')]
        group: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
