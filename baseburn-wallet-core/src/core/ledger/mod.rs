//! Local burn ledger
//!
//! Owns the burn history and the derived summary, and writes both through a
//! [`KeyValueStore`] after every mutation. The ledger itself is a plain owned
//! value; concurrent callers reach it through [`crate::core::events`].

use std::sync::Arc;

use crate::domain::entities::{BurnRecord, BurnStatus, LedgerSummary, TokenInfo};
use crate::domain::repositories::KeyValueStore;
use crate::shared::constants::{HISTORY_KEY, POINTS_KEY, TOTAL_BURNED_KEY};
use crate::shared::error::BurnError;
use crate::shared::types::{Amount, BurnResult};

/// Parse a user-entered amount and check it against a known balance.
///
/// Nothing is created or persisted here; callers use it to reject bad input
/// before any other work.
pub fn validate_amount(amount: &str, balance: Option<Amount>) -> BurnResult<Amount> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(BurnError::validation("Please enter an amount"));
    }

    let value: Amount = amount
        .parse()
        .map_err(|_| BurnError::validation(format!("Invalid amount: {}", amount)))?;

    if value.is_zero() {
        return Err(BurnError::validation("Amount must be greater than zero"));
    }

    if let Some(balance) = balance {
        if value > balance {
            return Err(BurnError::validation(format!(
                "Insufficient balance: {} requested, {} available",
                value, balance
            )));
        }
    }

    Ok(value)
}

/// Burn history plus cumulative summary, persisted on every change
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    history: Vec<BurnRecord>,
    summary: LedgerSummary,
}

impl Ledger {
    /// Load the ledger from storage.
    ///
    /// Missing or malformed entries fall back to empty/zero. The stored
    /// summary is checked against the fold of the history; the fold wins.
    pub fn rehydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let history = load_history(store.as_ref());
        let stored = load_summary(store.as_ref());
        let summary = LedgerSummary::from_history(&history);

        let ledger = Self {
            store,
            history,
            summary,
        };

        if stored != ledger.summary {
            log::warn!(
                "Stored summary ({} points, {} burned) disagrees with history ({} points, {} burned); using history",
                stored.points,
                stored.total_burned,
                ledger.summary.points,
                ledger.summary.total_burned
            );
            if let Err(e) = ledger.persist_summary() {
                log::warn!("Failed to rewrite ledger summary: {}", e);
            }
        }

        log::info!(
            "Ledger rehydrated: {} records, {} points",
            ledger.history.len(),
            ledger.summary.points
        );
        ledger
    }

    /// Record a new burn attempt as pending, newest first.
    pub fn submit(
        &mut self,
        amount: &str,
        token: &TokenInfo,
        balance: Option<Amount>,
    ) -> BurnResult<BurnRecord> {
        let amount = validate_amount(amount, balance)?;
        let record = BurnRecord::pending(token, amount);

        self.history.insert(0, record.clone());
        if let Err(e) = self.persist_history() {
            self.history.remove(0);
            return Err(e);
        }

        log::info!(
            "Burn {} submitted: {} {} ({} points pending)",
            record.id,
            record.amount,
            record.token_symbol,
            record.points_earned
        );
        Ok(record)
    }

    /// Set the transaction hash of a record. The first hash sticks.
    ///
    /// A broadcast hash is kept in memory even when the write fails; the
    /// error is still returned and the next successful write carries it.
    pub fn attach_hash(&mut self, id: &str, hash: &str) -> BurnResult<()> {
        if hash.is_empty() {
            return Err(BurnError::validation("Transaction hash cannot be empty"));
        }

        let index = self.index_of(id)?;
        let record = &mut self.history[index];
        if record.has_hash() {
            if record.hash != hash {
                log::warn!(
                    "Burn {} already has hash {}; ignoring {}",
                    id,
                    record.hash,
                    hash
                );
            }
            return Ok(());
        }

        record.hash = hash.to_string();
        self.persist_history()?;

        log::debug!("Burn {} hash attached: {}", id, hash);
        Ok(())
    }

    /// Move a pending record to success and credit its points and amount.
    pub fn mark_success(&mut self, id: &str) -> BurnResult<BurnRecord> {
        let index = self.index_of(id)?;
        let previous_summary = self.summary.clone();

        let record = &mut self.history[index];
        record.transition(BurnStatus::Success)?;
        let amount = record.parsed_amount().unwrap_or_else(|e| {
            log::warn!("Burn {} has an unparseable amount, crediting points only: {}", id, e);
            Amount::zero()
        });
        let record = record.clone();
        self.summary.credit(&record, amount);

        if let Err(e) = self.persist_history() {
            self.history[index].status = BurnStatus::Pending;
            self.summary = previous_summary;
            return Err(e);
        }
        // History is the source of truth; a stale summary is repaired on rehydrate.
        if let Err(e) = self.persist_summary() {
            log::warn!("Failed to persist ledger summary: {}", e);
        }

        log::info!(
            "Burn {} confirmed: +{} points (total {})",
            id,
            record.points_earned,
            self.summary.points
        );
        Ok(record)
    }

    /// Move a pending record to failed. The summary is untouched.
    pub fn mark_failed(&mut self, id: &str) -> BurnResult<BurnRecord> {
        let index = self.index_of(id)?;
        self.history[index].transition(BurnStatus::Failed)?;

        if let Err(e) = self.persist_history() {
            self.history[index].status = BurnStatus::Pending;
            return Err(e);
        }

        log::info!("Burn {} marked failed", id);
        Ok(self.history[index].clone())
    }

    /// All records, newest first
    pub fn history(&self) -> &[BurnRecord] {
        &self.history
    }

    pub fn summary(&self) -> &LedgerSummary {
        &self.summary
    }

    pub fn record(&self, id: &str) -> Option<&BurnRecord> {
        self.history.iter().find(|record| record.id == id)
    }

    /// Records still awaiting a terminal status
    pub fn pending(&self) -> Vec<BurnRecord> {
        self.history
            .iter()
            .filter(|record| record.status == BurnStatus::Pending)
            .cloned()
            .collect()
    }

    fn index_of(&self, id: &str) -> BurnResult<usize> {
        self.history
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| BurnError::record_not_found(id))
    }

    fn persist_history(&self) -> BurnResult<()> {
        let json = serde_json::to_string(&self.history)?;
        self.store.set(HISTORY_KEY, &json)
    }

    fn persist_summary(&self) -> BurnResult<()> {
        self.store.set(POINTS_KEY, &self.summary.points.to_string())?;
        self.store
            .set(TOTAL_BURNED_KEY, &self.summary.total_burned.to_string())
    }
}

fn load_history(store: &dyn KeyValueStore) -> Vec<BurnRecord> {
    match store.get(HISTORY_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Discarding malformed burn history: {}", e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            log::warn!("Failed to read burn history: {}", e);
            Vec::new()
        }
    }
}

fn load_summary(store: &dyn KeyValueStore) -> LedgerSummary {
    let points = read_value(store, POINTS_KEY)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or_default();
    let total_burned = read_value(store, TOTAL_BURNED_KEY)
        .and_then(|value| value.trim().parse::<Amount>().ok())
        .unwrap_or_default();
    LedgerSummary {
        points,
        total_burned,
    }
}

fn read_value(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|e| {
        log::warn!("Failed to read {}: {}", key, e);
        None
    })
}
