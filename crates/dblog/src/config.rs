//! Configuration for [`LoggingHook`](crate::LoggingHook).

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;

/// Default template for connection-open events.
pub const DEFAULT_OPEN_CONNECTION_MESSAGE: &str =
    "Connection opened in {elapsed:0.00} ms, context: {@context}, connection: {@connection}";

/// Default template for connection-close events.
pub const DEFAULT_CLOSE_CONNECTION_MESSAGE: &str =
    "Connection closed in {elapsed:0.00} ms, context: {@context}, connection: {@connection}";

/// Default template for command execution events.
pub const DEFAULT_EXECUTE_QUERY_MESSAGE: &str = "Executed query in {elapsed:0.00} ms: {query}, \
     params: [{params}], context: {@context}, connection: {@connection}";

/// Default category for connection events.
pub const DEFAULT_CONNECTION_CATEGORY: &str = "dblog::connection";

/// Default category for command events.
pub const DEFAULT_COMMAND_CATEGORY: &str = "dblog::command";

/// Reduces a real connection to a small loggable summary.
pub type ConnectionProjector<C> = Arc<dyn Fn(&C) -> JsonValue + Send + Sync>;

/// Resolved configuration used by [`LoggingHook`](crate::LoggingHook).
///
/// Built from a [`LoggingConfigBuilder`]; every field has a value.
pub struct LoggingConfig<C> {
    /// Level every event is emitted at.
    pub level: Level,
    pub open_connection_message: String,
    pub close_connection_message: String,
    pub execute_query_message: String,
    /// Log parameter values instead of the redaction marker.
    pub log_sensitive_data: bool,
    /// Projection of the connection logged under `@connection`.
    pub connection_projector: ConnectionProjector<C>,
    /// Logger category for connection events.
    pub connection_category: String,
    /// Logger category for command events.
    pub command_category: String,
}

impl<C> LoggingConfig<C> {
    /// Start from defaults.
    pub fn builder() -> LoggingConfigBuilder<C> {
        LoggingConfigBuilder::default()
    }
}

impl<C> Default for LoggingConfig<C> {
    fn default() -> Self {
        LoggingConfigBuilder::default().build()
    }
}

impl<C> Clone for LoggingConfig<C> {
    fn clone(&self) -> Self {
        Self {
            level: self.level,
            open_connection_message: self.open_connection_message.clone(),
            close_connection_message: self.close_connection_message.clone(),
            execute_query_message: self.execute_query_message.clone(),
            log_sensitive_data: self.log_sensitive_data,
            connection_projector: Arc::clone(&self.connection_projector),
            connection_category: self.connection_category.clone(),
            command_category: self.command_category.clone(),
        }
    }
}

impl<C> fmt::Debug for LoggingConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("level", &self.level)
            .field("open_connection_message", &self.open_connection_message)
            .field("close_connection_message", &self.close_connection_message)
            .field("execute_query_message", &self.execute_query_message)
            .field("log_sensitive_data", &self.log_sensitive_data)
            .field("connection_projector", &"<fn>")
            .field("connection_category", &self.connection_category)
            .field("command_category", &self.command_category)
            .finish()
    }
}

/// Builder for [`LoggingConfig`].
///
/// Fields are public so a builder can also be written out directly; anything
/// left as `None` falls back to its default in [`build`](Self::build).
pub struct LoggingConfigBuilder<C> {
    pub log_level: Option<Level>,
    pub open_connection_message: Option<String>,
    pub close_connection_message: Option<String>,
    pub execute_query_message: Option<String>,
    pub log_sensitive_data: bool,
    pub connection_projector: Option<ConnectionProjector<C>>,
    pub connection_category: Option<String>,
    pub command_category: Option<String>,
}

impl<C> Default for LoggingConfigBuilder<C> {
    fn default() -> Self {
        Self {
            log_level: None,
            open_connection_message: None,
            close_connection_message: None,
            execute_query_message: None,
            log_sensitive_data: false,
            connection_projector: None,
            connection_category: None,
            command_category: None,
        }
    }
}

impl<C> LoggingConfigBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level events are emitted at (default: `INFO`).
    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn with_open_connection_message(mut self, template: impl Into<String>) -> Self {
        self.open_connection_message = Some(template.into());
        self
    }

    pub fn with_close_connection_message(mut self, template: impl Into<String>) -> Self {
        self.close_connection_message = Some(template.into());
        self
    }

    pub fn with_execute_query_message(mut self, template: impl Into<String>) -> Self {
        self.execute_query_message = Some(template.into());
        self
    }

    /// Log parameter values as-is.
    ///
    /// **Security Warning**: parameters often carry user input, credentials or
    /// PII. Keep this off outside development.
    pub fn with_sensitive_data_logging(mut self) -> Self {
        self.log_sensitive_data = true;
        self
    }

    /// Log `project(connection)` under `@connection` with every event.
    ///
    /// A projection that cannot be serialized is logged as `null`.
    pub fn with_connection_projector<F, P>(mut self, project: F) -> Self
    where
        F: Fn(&C) -> P + Send + Sync + 'static,
        P: Serialize,
    {
        let projector: ConnectionProjector<C> = Arc::new(move |conn: &C| {
            serde_json::to_value(project(conn)).unwrap_or(JsonValue::Null)
        });
        self.connection_projector = Some(projector);
        self
    }

    pub fn with_connection_category(mut self, category: impl Into<String>) -> Self {
        self.connection_category = Some(category.into());
        self
    }

    pub fn with_command_category(mut self, category: impl Into<String>) -> Self {
        self.command_category = Some(category.into());
        self
    }

    /// Apply file-based settings on top of this builder.
    ///
    /// Only fields present in `settings` are applied. An unrecognized level
    /// name is ignored with a warning.
    pub fn with_settings(mut self, settings: &LoggingSettings) -> Self {
        if let Some(name) = settings.level.as_deref() {
            match Level::from_str(name) {
                Ok(level) => self.log_level = Some(level),
                Err(_) => tracing::warn!(
                    target: "dblog",
                    value = name,
                    "ignoring unrecognized log level in settings"
                ),
            }
        }
        if let Some(t) = &settings.open_connection_message {
            self.open_connection_message = Some(t.clone());
        }
        if let Some(t) = &settings.close_connection_message {
            self.close_connection_message = Some(t.clone());
        }
        if let Some(t) = &settings.execute_query_message {
            self.execute_query_message = Some(t.clone());
        }
        if let Some(enabled) = settings.log_sensitive_data {
            self.log_sensitive_data = enabled;
        }
        if let Some(c) = &settings.connection_category {
            self.connection_category = Some(c.clone());
        }
        if let Some(c) = &settings.command_category {
            self.command_category = Some(c.clone());
        }
        self
    }

    /// Resolve the configuration, filling in defaults.
    pub fn build(self) -> LoggingConfig<C> {
        let connection_projector: ConnectionProjector<C> = match self.connection_projector {
            Some(projector) => projector,
            None => Arc::new(|_: &C| JsonValue::Null),
        };
        LoggingConfig {
            level: self.log_level.unwrap_or(Level::INFO),
            open_connection_message: self
                .open_connection_message
                .unwrap_or_else(|| DEFAULT_OPEN_CONNECTION_MESSAGE.to_string()),
            close_connection_message: self
                .close_connection_message
                .unwrap_or_else(|| DEFAULT_CLOSE_CONNECTION_MESSAGE.to_string()),
            execute_query_message: self
                .execute_query_message
                .unwrap_or_else(|| DEFAULT_EXECUTE_QUERY_MESSAGE.to_string()),
            log_sensitive_data: self.log_sensitive_data,
            connection_projector,
            connection_category: self
                .connection_category
                .unwrap_or_else(|| DEFAULT_CONNECTION_CATEGORY.to_string()),
            command_category: self
                .command_category
                .unwrap_or_else(|| DEFAULT_COMMAND_CATEGORY.to_string()),
        }
    }
}

/// Serializable logging settings, e.g. a `[dblog]` table in a TOML file.
///
/// The connection projector is code and cannot come from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level name: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: Option<String>,
    pub open_connection_message: Option<String>,
    pub close_connection_message: Option<String>,
    pub execute_query_message: Option<String>,
    pub log_sensitive_data: Option<bool>,
    pub connection_category: Option<String>,
    pub command_category: Option<String>,
}
