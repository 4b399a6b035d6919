pub mod config;
pub mod logger;

pub use config::HostConfig;
pub use logger::{EnhancedLogger, LogConfig, Logger};
