//! Burn record and ledger summary
//!
//! A [`BurnRecord`] tracks one burn attempt from submission to its terminal
//! status. The [`LedgerSummary`] is the fold of every successful record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenInfo;
use crate::shared::error::BurnError;
use crate::shared::types::{Amount, TransactionHash};
use crate::shared::utils::{current_timestamp_millis, generate_record_id};

/// Lifecycle tag of a burn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnStatus {
    Pending,
    Success,
    Failed,
}

impl BurnStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BurnStatus::Pending)
    }
}

impl fmt::Display for BurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurnStatus::Pending => f.write_str("pending"),
            BurnStatus::Success => f.write_str("success"),
            BurnStatus::Failed => f.write_str("failed"),
        }
    }
}

/// One burn attempt, stored in the `burn-history` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRecord {
    pub id: String,
    /// Empty until the wallet layer assigns a hash
    pub hash: TransactionHash,
    pub token_symbol: String,
    pub token_name: String,
    pub token_address: String,
    pub amount: String,
    pub points_earned: u64,
    /// Unix milliseconds
    pub timestamp: i64,
    pub status: BurnStatus,
}

impl BurnRecord {
    /// Create a pending record for a validated amount
    pub fn pending(token: &TokenInfo, amount: Amount) -> Self {
        Self {
            id: generate_record_id(),
            hash: String::new(),
            token_symbol: token.symbol.clone(),
            token_name: token.name.clone(),
            token_address: token.address.clone(),
            amount: amount.to_string(),
            points_earned: amount.points(),
            timestamp: current_timestamp_millis(),
            status: BurnStatus::Pending,
        }
    }

    pub fn has_hash(&self) -> bool {
        !self.hash.is_empty()
    }

    /// Parsed amount. Records written by older builds may carry loose text.
    pub fn parsed_amount(&self) -> Result<Amount, BurnError> {
        self.amount.parse()
    }

    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Move out of `Pending`. Terminal records refuse any further change.
    pub(crate) fn transition(&mut self, status: BurnStatus) -> Result<(), BurnError> {
        if self.status.is_terminal() {
            return Err(BurnError::InvalidTransition {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        self.status = status;
        Ok(())
    }
}

/// Cumulative points and burned amount over successful records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerSummary {
    pub points: u64,
    pub total_burned: Amount,
}

impl LedgerSummary {
    /// Fold over the success records of a history
    pub fn from_history<'a>(records: impl IntoIterator<Item = &'a BurnRecord>) -> Self {
        records
            .into_iter()
            .filter(|record| record.status == BurnStatus::Success)
            .fold(Self::default(), |mut summary, record| {
                summary.points = summary.points.saturating_add(record.points_earned);
                match record.parsed_amount() {
                    Ok(amount) => summary.total_burned = summary.total_burned.saturating_add(amount),
                    Err(e) => log::warn!("Skipping unparseable amount on record {}: {}", record.id, e),
                }
                summary
            })
    }

    pub(crate) fn credit(&mut self, record: &BurnRecord, amount: Amount) {
        self.points = self.points.saturating_add(record.points_earned);
        self.total_burned = self.total_burned.saturating_add(amount);
    }
}
