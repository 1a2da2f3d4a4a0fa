use crate::config::LoggingConfig;
use crate::driver::{DbCommand, DbConnection};
use crate::hook::SqlHook;
use crate::logger::{LogRecord, Logger, LoggerFactory, keys};
use crate::params::loggable_parameters;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

/// A [`SqlHook`] that turns every event into a structured [`LogRecord`].
///
/// Connection events go to the logger of
/// [`connection_category`](LoggingConfig::connection_category), command events
/// to the logger of [`command_category`](LoggingConfig::command_category).
/// Loggers are created lazily, once per category, and cached.
///
/// State keys written (see [`keys`]):
///
/// | Event | Keys |
/// |-------|------|
/// | open / close | `elapsed`, `@context`, `@connection` |
/// | execute | `query`, `params`, `elapsed`, `@context`, `@connection` |
pub struct LoggingHook<C, T> {
    logger_factory: Arc<dyn LoggerFactory>,
    config: LoggingConfig<C>,
    loggers: RwLock<HashMap<String, Arc<dyn Logger>>>,
    _context: PhantomData<fn(&T)>,
}

impl<C, T> LoggingHook<C, T> {
    pub fn new(logger_factory: Arc<dyn LoggerFactory>, config: LoggingConfig<C>) -> Self {
        Self {
            logger_factory,
            config,
            loggers: RwLock::new(HashMap::new()),
            _context: PhantomData,
        }
    }

    pub fn config(&self) -> &LoggingConfig<C> {
        &self.config
    }

    /// Get the logger for `category`, creating it on first use.
    fn logger(&self, category: &str) -> Arc<dyn Logger> {
        {
            let loggers = self.loggers.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(logger) = loggers.get(category) {
                return Arc::clone(logger);
            }
        }

        let mut loggers = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
        let logger = loggers
            .entry(category.to_string())
            .or_insert_with(|| self.logger_factory.create_logger(category));
        Arc::clone(logger)
    }

    fn connection_event(&self, template: &str, connection: &C, context: &T, elapsed_ms: f64)
    where
        T: Serialize,
    {
        let logger = self.logger(&self.config.connection_category);
        if !logger.is_enabled(self.config.level) {
            return;
        }

        let state = vec![
            (keys::ELAPSED, JsonValue::from(elapsed_ms)),
            (keys::CONTEXT, to_json(context)),
            (keys::CONNECTION, (self.config.connection_projector)(connection)),
        ];
        logger.log(&LogRecord::new(
            self.config.level,
            self.config.connection_category.as_str(),
            template,
            state,
        ));
    }
}

fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

impl<C, T> SqlHook<C, T> for LoggingHook<C, T>
where
    C: DbConnection,
    C::Command: DbCommand<Connection = C>,
    T: Serialize,
{
    fn connection_opened(&self, connection: &C, context: &T, elapsed_ms: f64) {
        self.connection_event(
            &self.config.open_connection_message,
            connection,
            context,
            elapsed_ms,
        );
    }

    fn connection_closed(&self, connection: &C, context: &T, elapsed_ms: f64) {
        self.connection_event(
            &self.config.close_connection_message,
            connection,
            context,
            elapsed_ms,
        );
    }

    fn command_executed(&self, command: &C::Command, context: &T, elapsed_ms: f64) {
        let logger = self.logger(&self.config.command_category);
        if !logger.is_enabled(self.config.level) {
            return;
        }

        let params = loggable_parameters(command.parameters(), !self.config.log_sensitive_data);
        let state = vec![
            (keys::QUERY, JsonValue::from(command.text())),
            (keys::PARAMS, JsonValue::String(params.to_string())),
            (keys::ELAPSED, JsonValue::from(elapsed_ms)),
            (keys::CONTEXT, to_json(context)),
            (
                keys::CONNECTION,
                (self.config.connection_projector)(command.connection()),
            ),
        ];
        logger.log(&LogRecord::new(
            self.config.level,
            self.config.command_category.as_str(),
            &self.config.execute_query_message,
            state,
        ));
    }
}

impl<C, T> fmt::Debug for LoggingHook<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingHook")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
