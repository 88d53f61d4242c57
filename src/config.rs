//! Configuration management

use std::{env, path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// USDC mint on Solana mainnet
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
/// USDT mint on Solana mainnet
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
/// Wrapped SOL mint
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Environment files to load before resolving `env:` references.
    /// Paths support ~ expansion. Loaded in order, later files override earlier.
    pub env_files: Vec<String>,
    /// Server configuration
    pub server: ServerConfig,
    /// Transaction provider configuration
    pub provider: ProviderConfig,
    /// Summarizer heuristics
    pub analysis: AnalysisConfig,
    /// Public service identity shown on `/` and in analysis envelopes
    pub service: ServiceConfig,
    /// Countdown challenge page
    pub challenge: ChallengeConfig,
    /// Static deal page
    pub deal: DealConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4020,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Transaction provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key (supports `env:VAR_NAME`)
    pub api_key: String,
    /// Base URL of the enhanced transactions API
    pub api_base_url: String,
    /// JSON-RPC endpoint used for the signature-only fallback
    pub rpc_url: String,
    /// Outbound request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Number of records requested per wallet
    pub page_size: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: "env:HELIUS_API_KEY".to_string(),
            api_base_url: "https://api-mainnet.helius-rpc.com/v0".to_string(),
            rpc_url: "https://mainnet.helius-rpc.com".to_string(),
            timeout: Duration::from_secs(10),
            page_size: 100,
        }
    }
}

impl ProviderConfig {
    /// Resolve the API key (expand `env:` references)
    #[must_use]
    pub fn resolve_api_key(&self) -> String {
        resolve_env_ref(&self.api_key).unwrap_or_default()
    }
}

/// Heuristics used by the wallet summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Flat USD price applied to wrapped SOL transfers. Not a live quote.
    pub sol_price_usd: f64,
    /// Mints counted one-to-one as USD
    pub stablecoin_mints: Vec<String>,
    /// Wrapped SOL mint
    pub wrapped_sol_mint: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sol_price_usd: 150.0,
            stablecoin_mints: vec![USDC_MINT.to_string(), USDT_MINT.to_string()],
            wrapped_sol_mint: WRAPPED_SOL_MINT.to_string(),
        }
    }
}

/// Public identity of the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,
    /// Agent name reported in analysis responses
    pub agent: String,
    /// Agent description shown on the index page
    pub agent_description: String,
    /// Wallet the service operates from
    pub wallet: String,
    /// Social handle
    pub twitter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "TalTClaw Wallet Analysis API".to_string(),
            agent: "TalTClaw".to_string(),
            agent_description: "TalTClaw — Autonomous AI Agent on Solana".to_string(),
            wallet: "3Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe".to_string(),
            twitter: "@TalTCrypto".to_string(),
        }
    }
}

/// Countdown challenge page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Serve `/challenge` and `/challenge/status`
    pub enabled: bool,
    /// Wallet the payment would have to reach
    pub wallet: String,
    /// Amount the rules ask for, in SOL
    pub required_sol: f64,
    /// Length of the window, measured from process start
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// Text revealed once the window closes (supports `env:VAR_NAME`)
    pub secret: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            wallet: ServiceConfig::default().wallet,
            required_sol: 5.4321,
            duration: Duration::from_secs(24 * 60 * 60),
            secret: String::new(),
        }
    }
}

impl ChallengeConfig {
    /// Resolve the secret (expand `env:` references)
    #[must_use]
    pub fn resolve_secret(&self) -> String {
        resolve_env_ref(&self.secret).unwrap_or_default()
    }
}

/// Static deal page configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealConfig {
    /// HTML file served at `/deal`
    pub html_path: Option<String>,
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (TALTCLAW_ prefix)
        figment = figment.merge(Env::prefixed("TALTCLAW_").split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        // Env files must be in place before any `env:` reference is resolved
        config.load_env_files();

        Ok(config)
    }

    /// Load environment files into the process environment.
    /// Supports ~ expansion. Files that don't exist are silently skipped.
    fn load_env_files(&self) {
        for path_str in &self.env_files {
            let expanded = if path_str.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    path_str.replacen('~', &home.display().to_string(), 1)
                } else {
                    path_str.clone()
                }
            } else {
                path_str.clone()
            };

            let path = Path::new(&expanded);
            if path.exists() {
                match dotenvy::from_path(path) {
                    Ok(()) => tracing::info!("Loaded env file: {expanded}"),
                    Err(e) => tracing::warn!("Failed to load env file {expanded}: {e}"),
                }
            } else {
                tracing::debug!("Env file not found (skipped): {expanded}");
            }
        }
    }
}

/// Resolve a value that may be an `env:VAR_NAME` reference.
///
/// Literal values are returned as-is; a reference to an unset variable
/// resolves to `None`.
#[must_use]
pub fn resolve_env_ref(value: &str) -> Option<String> {
    match value.strip_prefix("env:") {
        Some(var_name) => env::var(var_name).ok(),
        None => Some(value.to_string()),
    }
}

/// Human-readable serde for `Duration` ("10s", "5m", "24h", "250ms")
pub mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serialize Duration to a human-readable string (e.g., "30s")
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the serializer fails.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    /// Deserialize a human-readable duration string
    ///
    /// # Errors
    ///
    /// Returns a deserialization error if the string cannot be parsed as a duration.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(s.trim()).map_err(serde::de::Error::custom)
    }

    /// Parse "250ms", "30s", "5m", "24h" or a bare number of seconds
    ///
    /// # Errors
    ///
    /// Returns the integer parse error for malformed input.
    pub fn parse(s: &str) -> Result<Duration, std::num::ParseIntError> {
        // "ms" first: it also ends with 's'
        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>().map(Duration::from_millis)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>().map(Duration::from_secs)
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.parse::<u64>().map(|m| Duration::from_secs(m * 60))
        } else if let Some(hours) = s.strip_suffix('h') {
            hours.parse::<u64>().map(|h| Duration::from_secs(h * 3600))
        } else {
            s.parse::<u64>().map(Duration::from_secs)
        }
    }
}
