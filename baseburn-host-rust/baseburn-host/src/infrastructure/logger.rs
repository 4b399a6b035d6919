use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::{Mutex, Once, OnceLock};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling, rolling::Rotation};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();
// Dropping a guard stops its writer thread, so they live for the process
static GUARDS: OnceLock<Mutex<Vec<WorkerGuard>>> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub service_name: String,
    pub version: String,
    pub enable_console: bool,
    pub enable_file: bool,
    pub log_directory: String,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
    pub enable_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "baseburn-host".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enable_console: true,
            enable_file: true,
            log_directory: "logs".to_string(),
            enable_colors: true,
            enable_thread_ids: false,
            enable_file_line: false,
        }
    }
}

impl LogConfig {
    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.service_name.replace('-', "_"))
    }

    /// `RUST_LOG` when set, otherwise this crate and actix at `level`.
    pub fn env_filter(&self) -> EnvFilter {
        let level = match self.level.to_lowercase().as_str() {
            level @ ("trace" | "debug" | "info" | "warn" | "error") => level.to_string(),
            _ => "info".to_string(),
        };
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("baseburn_host={level},actix_web={level}")))
    }
}

pub struct EnhancedLogger {
    config: LogConfig,
}

impl EnhancedLogger {
    pub fn new(config: LogConfig) -> Self {
        if config.enable_file {
            if let Err(e) = fs::create_dir_all(&config.log_directory) {
                eprintln!("Failed to create log directory: {e}");
            }
        }

        Self { config }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the global subscriber. Later calls are no-ops.
    pub fn init(&self) {
        INIT.call_once(|| {
            let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();

            if self.config.enable_console {
                let console_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(self.config.enable_thread_ids)
                    .with_file(self.config.enable_file_line)
                    .with_line_number(self.config.enable_file_line)
                    .with_ansi(self.config.enable_colors)
                    .with_writer(std::io::stdout);
                layers.push(Box::new(console_layer));
            }

            if self.config.enable_file {
                let file_appender = rolling::RollingFileAppender::new(
                    Rotation::DAILY,
                    &self.config.log_directory,
                    self.config.log_file_name(),
                );
                let (writer, guard) = non_blocking(file_appender);
                if let Ok(mut guards) = GUARDS.get_or_init(|| Mutex::new(Vec::new())).lock() {
                    guards.push(guard);
                }
                let file_layer = fmt::layer()
                    .with_timer(UtcTime::rfc_3339())
                    .with_thread_ids(self.config.enable_thread_ids)
                    .with_file(self.config.enable_file_line)
                    .with_line_number(self.config.enable_file_line)
                    .with_ansi(false)
                    .with_writer(writer);
                layers.push(Box::new(file_layer));
            }

            let subscriber = Registry::default()
                .with(self.config.env_filter())
                .with(layers);

            if let Err(e) = subscriber.try_init() {
                eprintln!("Failed to install log subscriber: {e}");
            }

            tracing::info!(
                service = %self.config.service_name,
                version = %self.config.version,
                "logging initialised"
            );
        });
    }
}

/// Shorthand used by the binary.
pub struct Logger;

impl Logger {
    pub fn init(level: &str, log_directory: &str) {
        EnhancedLogger::new(LogConfig {
            level: level.to_string(),
            log_directory: log_directory.to_string(),
            ..LogConfig::default()
        })
        .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        assert_eq!(LogConfig::default().log_file_name(), "baseburn_host.log");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let config = LogConfig {
            level: "LOUD".to_string(),
            ..LogConfig::default()
        };
        if std::env::var("RUST_LOG").is_err() {
            let filter = config.env_filter().to_string().to_lowercase();
            assert!(filter.contains("baseburn_host=info"));
            assert!(filter.contains("actix_web=info"));
        }
    }

    #[test]
    fn test_init_creates_directory_and_is_idempotent() {
        let dir = std::env::temp_dir().join(format!("baseburn-host-logs-{}", std::process::id()));
        let logger = EnhancedLogger::new(LogConfig {
            log_directory: dir.display().to_string(),
            enable_console: false,
            ..LogConfig::default()
        });
        assert!(dir.is_dir());

        logger.init();
        logger.init();
        let _ = fs::remove_dir_all(dir);
    }
}
