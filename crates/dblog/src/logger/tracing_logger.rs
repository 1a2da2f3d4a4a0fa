use super::{LogRecord, Logger, LoggerFactory};
use crate::config::{DEFAULT_COMMAND_CATEGORY, DEFAULT_CONNECTION_CATEGORY};
use std::sync::Arc;
use tracing::Level;

/// A [`LoggerFactory`] whose loggers emit `tracing` events.
///
/// Every record becomes one event carrying the logger category, the rendered
/// message and the state as a JSON object. The default categories map to
/// targets of the same name (`dblog::connection`, `dblog::command`), so a
/// filter such as `dblog::command=debug` selects one stream. Custom categories
/// share the `dblog` target and are told apart by the `category` field. Level
/// filtering is left to the installed subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggerFactory;

impl TracingLoggerFactory {
    pub fn new() -> Self {
        Self
    }
}

impl LoggerFactory for TracingLoggerFactory {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        Arc::new(TracingLogger::new(category))
    }
}

/// A logger for one category that forwards to `tracing`.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    category: String,
}

impl TracingLogger {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl Logger for TracingLogger {
    fn is_enabled(&self, level: Level) -> bool {
        /// Check `enabled!` at a runtime-determined level.
        macro_rules! enabled_at_level {
            ($target:literal, $level:expr) => {
                match $level {
                    Level::ERROR => tracing::enabled!(target: $target, Level::ERROR),
                    Level::WARN => tracing::enabled!(target: $target, Level::WARN),
                    Level::INFO => tracing::enabled!(target: $target, Level::INFO),
                    Level::DEBUG => tracing::enabled!(target: $target, Level::DEBUG),
                    Level::TRACE => tracing::enabled!(target: $target, Level::TRACE),
                }
            };
        }

        match self.category.as_str() {
            DEFAULT_CONNECTION_CATEGORY => enabled_at_level!("dblog::connection", level),
            DEFAULT_COMMAND_CATEGORY => enabled_at_level!("dblog::command", level),
            _ => enabled_at_level!("dblog", level),
        }
    }

    fn log(&self, record: &LogRecord) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let category = self.category.as_str();
        let state = record.state_json();
        macro_rules! emit_to {
            ($target:literal) => {
                emit_at_level!(
                    record.level,
                    target: $target,
                    category,
                    state = %state,
                    "{}",
                    record.message
                )
            };
        }

        match category {
            DEFAULT_CONNECTION_CATEGORY => emit_to!("dblog::connection"),
            DEFAULT_COMMAND_CATEGORY => emit_to!("dblog::command"),
            _ => emit_to!("dblog"),
        }
    }
}
