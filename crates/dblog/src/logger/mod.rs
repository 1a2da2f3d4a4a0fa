//! The logging backend seam.
//!
//! [`LoggingHook`](crate::LoggingHook) does not write anywhere itself; it
//! asks a [`LoggerFactory`] for one [`Logger`] per category and hands each a
//! fully built [`LogRecord`]. [`TracingLoggerFactory`] forwards records to
//! `tracing`; tests and applications can plug in their own factory.

mod record;
mod template;
mod tracing_logger;

pub use record::{LogRecord, keys};
pub use template::render;
pub use tracing_logger::{TracingLogger, TracingLoggerFactory};

use std::sync::Arc;
use tracing::Level;

/// A sink for log records of one category.
pub trait Logger: Send + Sync {
    /// Whether records at `level` would be kept.
    ///
    /// Callers skip building the record entirely when this returns `false`.
    fn is_enabled(&self, level: Level) -> bool {
        let _ = level;
        true
    }

    /// Write one record.
    fn log(&self, record: &LogRecord);
}

/// Creates loggers by category name.
pub trait LoggerFactory: Send + Sync {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger>;
}

impl<F: LoggerFactory + ?Sized> LoggerFactory for Arc<F> {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        (**self).create_logger(category)
    }
}
