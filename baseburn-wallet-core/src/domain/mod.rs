//! Domain layer - entities and repositories
//!
//! This module contains the burn ledger's domain objects and the storage
//! abstraction they are persisted through.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
