//! Rough USD volume estimate
//!
//! Only outgoing transfers of known stablecoins and wrapped SOL are priced.
//! Wrapped SOL uses a flat configured price, so the result is an
//! approximation and not an oracle-backed valuation.

use super::record::TransactionRecord;
use crate::config::AnalysisConfig;

/// USD value of the wallet's outgoing token transfers in one record
pub fn outgoing_usd(record: &TransactionRecord, wallet: &str, config: &AnalysisConfig) -> f64 {
    record
        .token_transfers
        .iter()
        .filter(|t| t.from_user_account.as_deref() == Some(wallet))
        .map(|t| {
            let mint = t.mint.as_deref().unwrap_or_default();
            let amount = t.token_amount.unwrap_or(0.0);
            if config.stablecoin_mints.iter().any(|m| m == mint) {
                amount
            } else if mint == config.wrapped_sol_mint {
                amount * config.sol_price_usd
            } else {
                0.0
            }
        })
        .sum()
}
