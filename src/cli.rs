//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TalTClaw wallet analysis API - behavioural profiling for Solana wallets
#[derive(Parser, Debug)]
#[command(name = "taltclaw-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "TALTCLAW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// IP address to bind to
    #[arg(long, env = "TALTCLAW_HOST")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "TALTCLAW_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "TALTCLAW_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,

    /// Analyze one wallet and print the result as JSON
    Analyze {
        /// Base58 wallet address
        #[arg(required = true)]
        wallet: String,
    },
}
