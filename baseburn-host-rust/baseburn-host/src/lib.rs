//! BaseBurn host
//!
//! Small actix-web server that publishes the mini app's identity manifest.

pub mod api;
pub mod domain;
pub mod infrastructure;
