//! Wallet address validation

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Base58 alphabet, 32 to 44 characters
static WALLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("wallet pattern compiles")
});

/// Whether `address` looks like a Solana public key
pub fn is_valid_wallet(address: &str) -> bool {
    WALLET_RE.is_match(address)
}

/// Validate a wallet address before any provider call
pub fn validate_wallet(address: &str) -> Result<()> {
    if is_valid_wallet(address) {
        Ok(())
    } else {
        Err(Error::InvalidWallet(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_addresses() {
        assert!(is_valid_wallet("3Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe"));
        assert!(is_valid_wallet("So11111111111111111111111111111111111111112"));
        assert!(is_valid_wallet("11111111111111111111111111111111"));
    }

    #[test]
    fn rejects_bad_length() {
        assert!(!is_valid_wallet("3Ni5XqaKYQnhvwTgbyT4"));
        assert!(!is_valid_wallet(&"1".repeat(31)));
        assert!(!is_valid_wallet(&"1".repeat(45)));
        assert!(!is_valid_wallet(""));
    }

    #[test]
    fn rejects_non_base58_characters() {
        // 0, O, I and l are excluded from Base58
        assert!(!is_valid_wallet("0Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe"));
        assert!(!is_valid_wallet("ONi5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe"));
        assert!(!is_valid_wallet("INi5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe"));
        assert!(!is_valid_wallet("lNi5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTxwHe"));
        assert!(!is_valid_wallet("3Ni5XqaKYQnhvwTgbyT4Dk68JDnuZKJNMVLpngvTx/He"));
    }

    #[test]
    fn validate_returns_typed_error() {
        let err = validate_wallet("short").unwrap_err();
        assert!(matches!(err, Error::InvalidWallet(ref w) if w == "short"));
    }
}
