//! HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use super::router::{AppState, create_router};
use crate::config::Config;
use crate::provider::{HeliusProvider, TransactionProvider};
use crate::{Error, Result};

/// Wallet analysis HTTP server
pub struct Server {
    config: Config,
    provider: Arc<dyn TransactionProvider>,
}

impl Server {
    /// Create a server backed by the Helius provider
    pub fn new(config: Config) -> Result<Self> {
        let helius = HeliusProvider::new(&config.provider)?;
        if helius.has_api_key() {
            info!("Helius API key configured");
        } else {
            warn!("No Helius API key resolved - enhanced fetches will fail and fall back to RPC");
        }
        Ok(Self::with_provider(config, Arc::new(helius)))
    }

    /// Create a server with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn TransactionProvider>) -> Self {
        Self { config, provider }
    }

    /// Run until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(
            self.config
                .server
                .host
                .parse()
                .map_err(|e| Error::Config(format!("Invalid host: {e}")))?,
            self.config.server.port,
        );

        let deal_html = load_deal_page(self.config.deal.html_path.as_deref()).await;
        let state = Arc::new(AppState::new(&self.config, self.provider, deal_html));
        let challenge_enabled = state.challenge.is_some();
        let deal_enabled = state.deal_html.is_some();
        if let Some(challenge) = &state.challenge {
            info!(
                secret_hash = %challenge.secret_hash(),
                expires = %challenge.expires_at(),
                "Challenge window open"
            );
        }

        let app = create_router(state);
        let listener = TcpListener::bind(addr).await?;

        let base = format!("http://{}:{}", self.config.server.host, self.config.server.port);
        info!("============================================================");
        info!("{} v{}", self.config.service.name, env!("CARGO_PKG_VERSION"));
        info!("============================================================");
        info!(host = %self.config.server.host, port = %self.config.server.port, "Listening");
        info!(wallet = %self.config.service.wallet, "Agent wallet");
        info!("  GET  {base}/analyze/{{wallet}}");
        info!("  GET  {base}/health");
        info!("  GET  {base}/stats");
        if deal_enabled {
            info!("  GET  {base}/deal");
        }
        if challenge_enabled {
            info!("  GET  {base}/challenge");
            info!("  GET  {base}/challenge/status");
        }
        info!("============================================================");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }
}

/// Read the deal page once; a missing file disables the route
async fn load_deal_page(path: Option<&str>) -> Option<String> {
    let path = path?;
    match tokio::fs::read_to_string(path).await {
        Ok(html) => {
            info!(path = %path, bytes = html.len(), "Loaded deal page");
            Some(html)
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to load deal page, /deal disabled");
            None
        }
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn deal_page_loaded_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1>The Deal</h1>").unwrap();
        let html = load_deal_page(file.path().to_str()).await;
        assert_eq!(html.as_deref(), Some("<h1>The Deal</h1>"));
    }

    #[tokio::test]
    async fn missing_deal_page_disables_route() {
        assert!(load_deal_page(Some("/nonexistent/deal.html")).await.is_none());
        assert!(load_deal_page(None).await.is_none());
    }

    #[tokio::test]
    async fn invalid_host_is_config_error() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        let server = Server::new(config).unwrap();
        let err = server.run().await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
