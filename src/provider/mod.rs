//! Transaction data providers
//!
//! The analyzer needs two things from a provider: enriched transaction
//! records for a wallet, and a plain signature list as a fallback when the
//! enriched feed is down.

mod helius;

pub use helius::HeliusProvider;

use async_trait::async_trait;

use crate::analysis::record::{SignatureInfo, TransactionRecord};
use crate::error::Result;

/// Source of wallet transaction history
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Fetch up to `limit` enriched records for `wallet`, newest first.
    async fn fetch_transactions(&self, wallet: &str, limit: u32) -> Result<Vec<TransactionRecord>>;

    /// Fetch up to `limit` raw signatures for `wallet`.
    async fn fetch_signatures(&self, wallet: &str, limit: u32) -> Result<Vec<SignatureInfo>>;
}
