//! HTTP router and handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::analysis::{WalletAnalyzer, validate_wallet};
use crate::challenge::Challenge;
use crate::config::{Config, ServiceConfig};
use crate::provider::TransactionProvider;
use crate::stats::ServiceStats;

/// Message returned for malformed wallet addresses
pub const INVALID_WALLET_MESSAGE: &str = "Invalid Solana wallet address";

/// Shared application state
pub struct AppState {
    /// Wallet analyzer
    pub analyzer: WalletAnalyzer,
    /// Query counter and uptime
    pub stats: ServiceStats,
    /// Public service identity
    pub service: ServiceConfig,
    /// Countdown challenge, when enabled
    pub challenge: Option<Challenge>,
    /// Pre-loaded `/deal` page
    pub deal_html: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl AppState {
    /// Assemble state from configuration and a provider
    pub fn new(
        config: &Config,
        provider: Arc<dyn TransactionProvider>,
        deal_html: Option<String>,
    ) -> Self {
        let analyzer = WalletAnalyzer::new(
            provider,
            config.analysis.clone(),
            config.provider.page_size,
        );
        let challenge = config
            .challenge
            .enabled
            .then(|| Challenge::new(&config.challenge));

        Self {
            analyzer,
            stats: ServiceStats::new(),
            service: config.service.clone(),
            challenge,
            deal_html,
            request_timeout: config.server.request_timeout,
        }
    }
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/analyze/{wallet}", get(analyze_handler))
        .route("/deal", get(deal_handler));

    if state.challenge.is_some() {
        router = router
            .route("/challenge", get(challenge_page_handler))
            .route("/challenge/status", get(challenge_status_handler));
    }

    let timeout =
        TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, state.request_timeout);

    router
        .layer(timeout)
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - service metadata
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "name": state.service.name,
        "agent": state.service.agent_description,
        "wallet": state.service.wallet,
        "twitter": state.service.twitter,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /": "This page (free)",
            "GET /health": "Health check (free)",
            "GET /analyze/:wallet": "Full behavioral analysis of any Solana wallet",
            "GET /stats": "Service statistics (free)"
        },
        "pricing": {
            "analyze": "Free during beta. x402 USDC payments coming soon.",
            "note": "Built by an AI agent. Powered by Helius."
        }
    }))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "alive",
        "uptime": state.stats.uptime().as_secs()
    }))
}

/// GET /stats
async fn stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.stats.snapshot())
}

/// GET /analyze/{wallet}
///
/// Every call is counted, including ones rejected by validation.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> Response {
    state.stats.record_query();

    if let Err(e) = validate_wallet(&wallet) {
        debug!(error = %e, "Rejected wallet address");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": INVALID_WALLET_MESSAGE })),
        )
            .into_response();
    }

    match state.analyzer.analyze(&wallet).await {
        Ok(analysis) => {
            info!(
                wallet = %wallet,
                classification = ?analysis.classification(),
                "Wallet analyzed"
            );
            Json(json!({
                "agent": state.service.agent,
                "wallet": wallet,
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "analysis": analysis,
                "_meta": {
                    "powered_by": "Helius Enhanced API",
                    "agent_wallet": state.service.wallet
                }
            }))
            .into_response()
        }
        Err(e) => {
            error!(wallet = %wallet, error = %e, "Analysis failed");
            (
                e.status_code(),
                Json(json!({ "error": "Analysis failed", "detail": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /deal
async fn deal_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.deal_html {
        Some(html) => Html(html.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response(),
    }
}

/// GET /challenge
async fn challenge_page_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.challenge {
        Some(challenge) => Html(challenge.render(Utc::now())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /challenge/status
async fn challenge_status_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.challenge {
        Some(challenge) => Json(challenge.status(Utc::now())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
