//! Clap derive structures for the `nukilatch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nukilatch -- bridge a Nuki smart lock to accessory services
#[derive(Debug, Parser)]
#[command(
    name = "nukilatch",
    version,
    about = "Bridge a Nuki smart lock to home-automation accessory services",
    long_about = "Exposes the bolt, latch, door sensor and battery of a lock paired with a\n\
        Nuki bridge as accessory services, and drives the lock through the bridge's\n\
        local HTTP API.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "NUKILATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Bridge host (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Bridge port (overrides config)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Lock nukiId (overrides config)
    #[arg(long, global = true)]
    pub nuki_id: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Log Enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bridge: register the callback, serve the webhook, mirror state
    Run,

    /// List devices paired with the bridge
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// List callback URLs registered with the bridge
    #[command(alias = "cb")]
    Callbacks,

    /// Register the webhook callback URL (no-op if already registered)
    Register(RegisterArgs),

    /// Lock the bolt
    Lock,

    /// Unlock the bolt without pulling the latch
    Unlock,

    /// Unlock and pull the latch
    Unlatch,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Subcommand Arguments ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Callback URL (defaults to the one derived from the [webhook] config)
    pub url: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
