//! TalTClaw Wallet Analysis API
//!
//! Behavioural profiling for Solana wallets, powered by Helius.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use taltclaw_api::{
    analysis::{WalletAnalyzer, validate_wallet},
    api::Server,
    cli::{Cli, Command},
    config::Config,
    provider::HeliusProvider,
    setup_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    match &cli.command {
        Some(Command::Analyze { wallet }) => run_analyze(&cli, wallet).await,
        Some(Command::Serve) | None => run_server(&cli).await,
    }
}

/// Load configuration and apply CLI overrides
fn load_config(cli: &Cli) -> Option<Config> {
    match Config::load(cli.config.as_deref()) {
        Ok(mut config) => {
            if let Some(port) = cli.port {
                config.server.port = port;
            }
            if let Some(ref host) = cli.host {
                config.server.host = host.clone();
            }
            Some(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            None
        }
    }
}

/// One-shot analysis printed to stdout
async fn run_analyze(cli: &Cli, wallet: &str) -> ExitCode {
    if let Err(e) = validate_wallet(wallet) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let Some(config) = load_config(cli) else {
        return ExitCode::FAILURE;
    };

    let provider = match HeliusProvider::new(&config.provider) {
        Ok(p) => Arc::new(p),
        Err(e) => {
            error!("Failed to create provider: {e}");
            return ExitCode::FAILURE;
        }
    };

    let analyzer = WalletAnalyzer::new(provider, config.analysis, config.provider.page_size);
    match analyzer.analyze(wallet).await {
        Ok(analysis) => match serde_json::to_string_pretty(&analysis) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize analysis: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(wallet = %wallet, "Analysis failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the HTTP server
async fn run_server(cli: &Cli) -> ExitCode {
    let Some(config) = load_config(cli) else {
        return ExitCode::FAILURE;
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.server.port,
        challenge = config.challenge.enabled,
        "Starting TalTClaw API"
    );

    let server = match Server::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create server: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Shutdown complete");
    ExitCode::SUCCESS
}
