//! Enhanced transaction records as returned by the provider
//!
//! Upstream fields are not guaranteed to be present or well typed, so every
//! field is optional and decodes leniently: `null` collections decode as
//! empty, list elements that do not decode are dropped, integers may arrive
//! as floats, and any other off-type value falls back to the field default.
//! One odd field never rejects the record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// One enriched transaction from the provider feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Transaction signature
    #[serde(deserialize_with = "lenient")]
    pub signature: Option<String>,
    /// Block time, epoch seconds
    #[serde(deserialize_with = "lenient_i64")]
    pub timestamp: Option<i64>,
    /// Error payload; any truthy value marks a failed transaction
    pub transaction_error: Option<Value>,
    /// Provider classification ("SWAP", "TRANSFER", ...)
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub tx_type: Option<String>,
    /// Program family that produced the transaction ("JUPITER", "SYSTEM_PROGRAM", ...)
    #[serde(deserialize_with = "lenient")]
    pub source: Option<String>,
    /// Top-level instructions
    #[serde(deserialize_with = "lenient_list")]
    pub instructions: Vec<Instruction>,
    /// SPL token movements
    #[serde(deserialize_with = "lenient_list")]
    pub token_transfers: Vec<TokenTransfer>,
    /// Lamport movements
    #[serde(deserialize_with = "lenient_list")]
    pub native_transfers: Vec<NativeTransfer>,
}

impl TransactionRecord {
    /// Whether the record carries a transaction-error marker.
    ///
    /// `null`, `false`, `0` and `""` are not markers.
    pub fn is_failed(&self) -> bool {
        match &self.transaction_error {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Provider type, `"UNKNOWN"` when absent
    pub fn tx_type(&self) -> &str {
        self.tx_type.as_deref().unwrap_or("UNKNOWN")
    }

    /// Provider source, `"UNKNOWN"` when absent
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("UNKNOWN")
    }
}

/// Instruction reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instruction {
    /// Invoked program
    #[serde(deserialize_with = "lenient")]
    pub program_id: Option<String>,
}

/// SPL token transfer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenTransfer {
    /// Sending wallet
    #[serde(deserialize_with = "lenient")]
    pub from_user_account: Option<String>,
    /// Receiving wallet
    #[serde(deserialize_with = "lenient")]
    pub to_user_account: Option<String>,
    /// Token mint
    #[serde(deserialize_with = "lenient")]
    pub mint: Option<String>,
    /// UI amount (decimals already applied)
    #[serde(deserialize_with = "lenient")]
    pub token_amount: Option<f64>,
}

/// Native SOL transfer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeTransfer {
    /// Sending wallet
    #[serde(deserialize_with = "lenient")]
    pub from_user_account: Option<String>,
    /// Receiving wallet
    #[serde(deserialize_with = "lenient")]
    pub to_user_account: Option<String>,
    /// Amount in lamports
    #[serde(deserialize_with = "lenient_u64")]
    pub amount: Option<u64>,
}

/// Signature entry from `getSignaturesForAddress`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignatureInfo {
    /// Transaction signature
    #[serde(deserialize_with = "lenient")]
    pub signature: String,
    /// Slot the transaction landed in
    #[serde(deserialize_with = "lenient_u64")]
    pub slot: Option<u64>,
    /// Block time, epoch seconds
    #[serde(deserialize_with = "lenient_i64")]
    pub block_time: Option<i64>,
    /// Error payload, if the transaction failed
    pub err: Option<Value>,
}

/// Decode a page of raw provider records, skipping entries that are not
/// records at all (non-objects).
pub fn decode_records(page: Vec<Value>) -> Vec<TransactionRecord> {
    page.into_iter()
        .filter_map(|raw| match serde_json::from_value::<TransactionRecord>(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable transaction record");
                None
            }
        })
        .collect()
}

/// Decode signature entries; every entry counts, odd ones decode as default.
pub fn decode_signatures(page: Vec<Value>) -> Vec<SignatureInfo> {
    page.into_iter()
        .map(|raw| serde_json::from_value(raw).unwrap_or_default())
        .collect()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    })
}
