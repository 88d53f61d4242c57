//! Error types for the wallet analysis service

use std::io;

use axum::http::StatusCode;
use thiserror::Error;

/// Result type alias for the wallet analysis service
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet analysis service errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wallet address failed Base58/length validation
    #[error("Invalid Solana wallet address: {0}")]
    InvalidWallet(String),

    /// Transaction provider answered with something unusable
    #[error("Provider error: {0}")]
    Provider(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status a handler should answer with for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidWallet(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_wallet_maps_to_bad_request() {
        let err = Error::InvalidWallet("abc".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_errors_map_to_internal() {
        assert_eq!(
            Error::Provider("Helius 502".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_includes_detail() {
        let err = Error::Provider("Helius 429".to_string());
        assert_eq!(err.to_string(), "Provider error: Helius 429");
    }
}
