//! Helius provider
//!
//! Enhanced transactions API for the primary fetch, plain JSON-RPC
//! `getSignaturesForAddress` for the fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::TransactionProvider;
use crate::analysis::record::{
    SignatureInfo, TransactionRecord, decode_records, decode_signatures,
};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};

/// Helius-backed [`TransactionProvider`]
pub struct HeliusProvider {
    client: Client,
    api_key: String,
    api_base_url: String,
    rpc_url: String,
}

/// JSON-RPC envelope; only `result` matters here
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
}

impl HeliusProvider {
    /// Build a provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key: config.resolve_api_key(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            rpc_url: config.rpc_url.clone(),
        })
    }

    /// Whether an API key was resolved
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn transactions_url(&self, wallet: &str) -> String {
        format!("{}/addresses/{wallet}/transactions/", self.api_base_url)
    }
}

#[async_trait]
impl TransactionProvider for HeliusProvider {
    async fn fetch_transactions(&self, wallet: &str, limit: u32) -> Result<Vec<TransactionRecord>> {
        let url = self.transactions_url(wallet);
        debug!(wallet = %wallet, limit, "Fetching enhanced transactions");

        let response = self
            .client
            .get(url)
            .query(&[("api-key", self.api_key.as_str())])
            .query(&[("limit", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(format!("Helius {}", status.as_u16())));
        }

        let page: Vec<Value> = response.json().await?;
        Ok(decode_records(page))
    }

    async fn fetch_signatures(&self, wallet: &str, limit: u32) -> Result<Vec<SignatureInfo>> {
        debug!(wallet = %wallet, limit, "Fetching signatures via RPC");

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getSignaturesForAddress",
            "params": [wallet, { "limit": limit }],
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .query(&[("api-key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let rpc: RpcResponse<Vec<Value>> = response.json().await?;
        Ok(decode_signatures(rpc.result.unwrap_or_default()))
    }
}
