//! HTTP surface tests driven through the router with an in-process provider

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

use taltclaw_api::{
    Error, Result,
    analysis::{SignatureInfo, TransactionRecord},
    api::{AppState, INVALID_WALLET_MESSAGE, create_router},
    config::Config,
    provider::TransactionProvider,
};

const WALLET: &str = "3Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe";

/// Scripted provider: `None` makes the corresponding call fail
struct ScriptedProvider {
    records: Option<Vec<TransactionRecord>>,
    signatures: Option<usize>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    fn new(records: Option<Vec<TransactionRecord>>, signatures: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            records,
            signatures,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl TransactionProvider for ScriptedProvider {
    async fn fetch_transactions(&self, _wallet: &str, _limit: u32) -> Result<Vec<TransactionRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .clone()
            .ok_or_else(|| Error::Provider("Helius 503 Service Unavailable".to_string()))
    }

    async fn fetch_signatures(&self, _wallet: &str, _limit: u32) -> Result<Vec<SignatureInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.signatures
            .map(|n| vec![SignatureInfo::default(); n])
            .ok_or_else(|| Error::Provider("rpc unreachable".to_string()))
    }
}

fn swap(ts: i64) -> TransactionRecord {
    TransactionRecord {
        tx_type: Some("SWAP".to_string()),
        source: Some("JUPITER".to_string()),
        timestamp: Some(ts),
        ..Default::default()
    }
}

fn router_with(config: &Config, provider: Arc<ScriptedProvider>, deal: Option<&str>) -> Router {
    let state = AppState::new(config, provider, deal.map(str::to_string));
    create_router(Arc::new(state))
}

fn router(provider: Arc<ScriptedProvider>) -> Router {
    router_with(&Config::default(), provider, None)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn health_reports_alive() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn index_lists_service_metadata() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, body) = get_json(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "TalTClaw Wallet Analysis API");
    assert_eq!(body["wallet"], WALLET);
    assert_eq!(body["twitter"], "@TalTCrypto");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["endpoints"]["GET /analyze/:wallet"].is_string());
    assert!(body["pricing"]["analyze"].is_string());
}

#[tokio::test]
async fn short_address_rejected_without_provider_call() {
    let provider = ScriptedProvider::new(Some(vec![]), Some(1));
    let app = router(Arc::clone(&provider));
    let (status, body) = get_json(&app, "/analyze/abcdefghijkmnopqrstu").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "error": INVALID_WALLET_MESSAGE }));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_base58_address_rejected() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    // '0' and 'O' are outside the Base58 alphabet
    let (status, _) = get_json(&app, "/analyze/0Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get_json(&app, "/analyze/ONi5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_count_every_analyze_call() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));

    let (_, body) = get_json(&app, "/stats").await;
    assert_eq!(body["totalQueries"], 0);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    get(&app, &format!("/analyze/{WALLET}")).await;
    get(&app, "/analyze/too-short").await;
    get(&app, "/health").await;

    let (status, body) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalQueries"], 2);
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn analyze_wraps_summary_in_envelope() {
    let records = vec![swap(1_704_283_200), swap(1_704_283_230), swap(1_704_283_260)];
    let app = router(ScriptedProvider::new(Some(records), None));
    let (status, body) = get_json(&app, &format!("/analyze/{WALLET}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent"], "TalTClaw");
    assert_eq!(body["wallet"], WALLET);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(body["_meta"]["powered_by"], "Helius Enhanced API");
    assert_eq!(body["_meta"]["agent_wallet"], WALLET);

    let analysis = &body["analysis"];
    assert_eq!(analysis["classification"], "bot_trader");
    assert_eq!(analysis["summary"]["total_txs"], 3);
    assert_eq!(analysis["summary"]["success_rate"], 1.0);
    assert_eq!(analysis["breakdown"]["swaps"], 3);
    assert_eq!(analysis["temporal"]["first_tx"], "2024-01-03T12:00:00.000Z");
    assert_eq!(analysis["temporal"]["last_tx"], "2024-01-03T12:01:00.000Z");
    assert_eq!(analysis["programs"]["top_sources"][0][0], "JUPITER");
    assert_eq!(analysis["programs"]["top_sources"][0][1], 3);
}

#[tokio::test]
async fn empty_wallet_shape() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, body) = get_json(&app, &format!("/analyze/{WALLET}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["analysis"],
        serde_json::json!({ "classification": "empty_wallet", "total_txs": 0 })
    );
}

#[tokio::test]
async fn enhanced_outage_degrades_to_limited() {
    let provider = ScriptedProvider::new(None, Some(37));
    let app = router(Arc::clone(&provider));
    let (status, body) = get_json(&app, &format!("/analyze/{WALLET}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["analysis"],
        serde_json::json!({
            "note": "Limited analysis (Enhanced API unavailable)",
            "total_txs": 37
        })
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn double_failure_is_server_error() {
    let app = router(ScriptedProvider::new(None, None));
    let (status, body) = get_json(&app, &format!("/analyze/{WALLET}")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Analysis failed");
    assert!(body["detail"].as_str().unwrap().contains("rpc unreachable"));
}

#[tokio::test]
async fn deal_missing_is_not_found() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, _) = get(&app, "/deal").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deal_served_as_html() {
    let app = router_with(
        &Config::default(),
        ScriptedProvider::new(Some(vec![]), None),
        Some("<h1>The Deal</h1>"),
    );
    let response = app
        .oneshot(Request::builder().uri("/deal").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>The Deal</h1>");
}

#[tokio::test]
async fn challenge_routes_absent_by_default() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, _) = get(&app, "/challenge").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/challenge/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn challenge_routes_when_enabled() {
    let mut config = Config::default();
    config.challenge.enabled = true;
    config.challenge.secret = "zq-hidden-token-42".to_string();
    let app = router_with(&config, ScriptedProvider::new(Some(vec![]), None), None);

    let (status, page) = get(&app, "/challenge").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("SECRET LOCKED"));
    assert!(!page.contains("zq-hidden-token-42"));

    let (status, body) = get_json(&app, "/challenge/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expired"], false);
    assert_eq!(body["wallet"], WALLET);
    assert_eq!(body["required_sol"], 5.4321);
    assert_eq!(body["secret_hash"].as_str().unwrap().len(), 64);
    assert!(body["remaining_seconds"].as_u64().unwrap() > 23 * 3600);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = router(ScriptedProvider::new(Some(vec![]), None));
    let (status, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Provider that never answers within the request budget
struct StalledProvider;

#[async_trait]
impl TransactionProvider for StalledProvider {
    async fn fetch_transactions(&self, _wallet: &str, _limit: u32) -> Result<Vec<TransactionRecord>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![])
    }

    async fn fetch_signatures(&self, _wallet: &str, _limit: u32) -> Result<Vec<SignatureInfo>> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn slow_analysis_times_out_with_408() {
    let mut config = Config::default();
    config.server.request_timeout = Duration::from_millis(50);
    let app = create_router(Arc::new(AppState::new(&config, Arc::new(StalledProvider), None)));

    let (status, _) = get(&app, &format!("/analyze/{WALLET}")).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
