//! Infrastructure layer - platform-specific implementations
//!
//! This module contains the key/value stores, runtime settings and the
//! EVM wallet adapter used by the burn core.

pub mod config;
pub mod evm;
pub mod platform;

// Re-export infrastructure components
pub use config::Settings;
pub use evm::EthersWallet;
pub use platform::{FileStorage, MemoryStorage};
