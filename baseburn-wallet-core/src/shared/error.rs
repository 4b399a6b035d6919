//! Error handling for the burn core
//!
//! This module defines the error types used throughout the burn core.

use thiserror::Error;

/// Burn core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BurnError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Unable to fetch token balance: {0}")]
    BalanceUnavailable(String),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionFailure),

    #[error("Token already exists in the list: {0}")]
    TokenAlreadyExists(String),

    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Burn record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid status transition for record {id}: already {status}")]
    InvalidTransition { id: String, status: String },

    #[error("Ledger is no longer running")]
    LedgerClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Categorised failure of a wallet/contract call.
///
/// The display text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionFailure {
    #[error("Transaction cancelled")]
    UserRejected,

    #[error("Insufficient funds for gas fees")]
    InsufficientGas,

    #[error("Transaction reverted on chain")]
    Reverted,

    #[error("Transaction failed. Please try again.")]
    Other(String),
}

impl TransactionFailure {
    /// Classify a raw wallet/provider error message.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("user rejected") || lower.contains("user denied") {
            Self::UserRejected
        } else if lower.contains("insufficient funds") {
            Self::InsufficientGas
        } else {
            Self::Other(message.to_string())
        }
    }
}

impl BurnError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn balance_unavailable(message: impl Into<String>) -> Self {
        Self::BalanceUnavailable(message.into())
    }

    /// Create a transaction error from a raw wallet message
    pub fn transaction(message: impl AsRef<str>) -> Self {
        Self::Transaction(TransactionFailure::classify(message.as_ref()))
    }

    pub fn token_already_exists(address: impl Into<String>) -> Self {
        Self::TokenAlreadyExists(address.into())
    }

    pub fn token_not_found(query: impl Into<String>) -> Self {
        Self::TokenNotFound(query.into())
    }

    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound(id.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

// Standard library error conversions
impl From<std::io::Error> for BurnError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for BurnError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for BurnError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for BurnError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}
