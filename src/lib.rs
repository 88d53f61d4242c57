//! TalTClaw Wallet Analysis API
//!
//! Behavioural profiling for Solana wallets over HTTP.
//!
//! # Features
//!
//! - **Summarizer**: transaction mix, success rate, temporal rhythm, outgoing
//!   volume estimate and a single behavioural label per wallet
//! - **Helius fetch with fallback**: enriched history first, signature count
//!   when the enriched feed is down
//! - **Service surface**: `/analyze/{wallet}`, `/health`, `/stats` and `/`,
//!   plus an optional countdown challenge and static deal page
//!
//! The summarizer is pure: see [`analysis::summarize`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod api;
pub mod challenge;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod stats;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = match format {
        Some("json") => subscriber.with(fmt::layer().json()).try_init(),
        _ => subscriber.with(fmt::layer()).try_init(),
    };

    installed.map_err(|e| Error::Internal(format!("Failed to install subscriber: {e}")))
}
