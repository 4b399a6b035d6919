//! Core burn functionality
//!
//! This module contains the local ledger, its event channel, the token
//! registry, the wallet seam and burn orchestration.

pub mod events;
pub mod ledger;
pub mod tokens;
pub mod transactions;
pub mod wallet;
