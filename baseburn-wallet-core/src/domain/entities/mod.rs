//! Domain entities and value objects

pub mod token;
pub mod burn;

// Re-export entities
pub use token::*;
pub use burn::*;
