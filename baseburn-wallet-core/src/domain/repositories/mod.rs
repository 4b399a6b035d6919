//! Domain repositories
//!
//! Storage traits the ledger and token registry persist through.

pub mod storage_repository;

// Re-export repositories
pub use storage_repository::*;
