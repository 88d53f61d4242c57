//! Wallet behaviour analysis
//!
//! [`WalletAnalyzer`] pulls a wallet's history from a
//! [`TransactionProvider`] and hands it to the pure [`summarize`] function.
//! When the enriched feed fails, it falls back once to a signature-only
//! query and reports a degraded [`Analysis::Limited`] result.

pub mod classify;
pub mod record;
pub mod summary;
pub mod volume;
pub mod wallet;

pub use classify::{ActivitySignals, Classification, ClassificationPolicy};
pub use record::{SignatureInfo, TransactionRecord};
pub use summary::{Analysis, WalletSummary, summarize, summarize_with};
pub use wallet::{is_valid_wallet, validate_wallet};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::provider::TransactionProvider;

/// Fetches and summarizes wallet history
pub struct WalletAnalyzer {
    provider: Arc<dyn TransactionProvider>,
    config: AnalysisConfig,
    policy: ClassificationPolicy,
    page_size: u32,
}

impl WalletAnalyzer {
    /// Create an analyzer with the default classification policy
    pub fn new(provider: Arc<dyn TransactionProvider>, config: AnalysisConfig, page_size: u32) -> Self {
        Self {
            provider,
            config,
            policy: ClassificationPolicy::default(),
            page_size,
        }
    }

    /// Replace the classification policy
    #[must_use]
    pub fn with_policy(mut self, policy: ClassificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Analyze one wallet.
    ///
    /// The address is expected to be validated already. Errors only surface
    /// when both the enriched fetch and the fallback fail.
    pub async fn analyze(&self, wallet: &str) -> Result<Analysis> {
        let records = match self.provider.fetch_transactions(wallet, self.page_size).await {
            Ok(records) => records,
            Err(e) => {
                warn!(wallet = %wallet, error = %e, "Enhanced fetch failed, falling back to signatures");
                let signatures = self.provider.fetch_signatures(wallet, self.page_size).await?;
                return Ok(Analysis::limited(signatures.len() as u64));
            }
        };

        debug!(wallet = %wallet, records = records.len(), "Summarizing wallet");
        Ok(summarize_with(wallet, &records, &self.config, &self.policy))
    }
}
