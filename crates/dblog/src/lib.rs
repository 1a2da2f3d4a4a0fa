//! # dblog
//!
//! Timed, structured logging for database connections and commands, without
//! changing how callers use them.
//!
//! ## Features
//!
//! - **Drop-in proxies**: [`ConnectionProxy`] and [`CommandProxy`] implement the same
//!   [`DbConnection`] / [`DbCommand`] traits as the driver they wrap
//! - **Three interception points**: `open`, `close` and `execute_*` are timed and reported;
//!   everything else is forwarded untouched
//! - **Transparent failures**: driver errors are returned unchanged and produce no event
//! - **Context**: any caller-supplied value travels with a connection and all its commands
//! - **Pluggable hooks**: implement [`SqlHook`] or use the bundled [`LoggingHook`]
//! - **Safe defaults**: parameter values are redacted unless sensitive data logging is enabled
//!
//! ## Example
//!
//! ```ignore
//! use dblog::{DbCommand, DbConnection, LoggingConfig, LoggingConnectionFactory};
//! use dblog::{SqliteConnection, TracingLoggerFactory};
//! use std::sync::Arc;
//!
//! let config = LoggingConfig::builder()
//!     .with_log_level(tracing::Level::DEBUG)
//!     .with_connection_projector(|c: &SqliteConnection| c.data_source().to_string())
//!     .build();
//! let factory = LoggingConnectionFactory::new(
//!     Arc::new(TracingLoggerFactory),
//!     config,
//!     || SqliteConnection::new("app.db"),
//! );
//!
//! let mut conn = factory.create_connection();
//! conn.open()?;                       // logs "Connection opened in ..."
//! let mut cmd = conn.create_command()?;
//! cmd.set_text("SELECT COUNT(*) FROM users WHERE active = :active".into());
//! cmd.parameters_mut().add("active", true);
//! let count = cmd.execute_scalar()?;  // logs the query, redacted params, elapsed time
//! ```
//!
//! ## Hook failures
//!
//! Hooks run after the delegated call succeeds and before the proxy returns. A
//! hook that panics unwinds through the proxied call, so a logging failure looks
//! exactly like a failure of the database call itself.

pub mod config;
pub mod driver;
pub mod error;
pub mod factory;
pub mod hook;
pub mod logger;
pub mod logging_hook;
pub mod params;
pub mod proxy;
pub mod registration;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{ConnectionProjector, LoggingConfig, LoggingConfigBuilder, LoggingSettings};
pub use driver::{CommandType, ConnectionState, DbCommand, DbConnection};
pub use error::{DbError, DbResult};
pub use factory::{
    ConnectFn, ContextualDbConnectionFactory, DbConnectionFactory, LoggingConnectionFactory,
};
pub use hook::{HookBinding, NoopHook, SqlHook};
pub use logger::{LogRecord, Logger, LoggerFactory, TracingLoggerFactory};
pub use logging_hook::LoggingHook;
pub use params::{LoggableParameters, REDACTED, loggable_parameters};
pub use proxy::{CommandProxy, ConnectionProxy};
pub use registration::{Lifetime, Registration, RegistrationBuilder, Scope, register, register_with_context};
pub use value::{Parameter, Parameters, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteCommand, SqliteConnection, SqliteReader};
