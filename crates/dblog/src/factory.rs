use crate::config::LoggingConfig;
use crate::driver::{DbCommand, DbConnection};
use crate::hook::SqlHook;
use crate::logger::LoggerFactory;
use crate::logging_hook::LoggingHook;
use crate::proxy::ConnectionProxy;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Function producing a real, not yet opened, connection.
pub type ConnectFn<C> = Arc<dyn Fn() -> C + Send + Sync>;

/// Creates connections that need no context.
pub trait DbConnectionFactory {
    type Connection: DbConnection;

    fn create_connection(&self) -> Self::Connection;
}

/// Creates connections carrying a caller-supplied context of type `T`.
pub trait ContextualDbConnectionFactory<T> {
    type Connection: DbConnection;

    fn create_connection_with(&self, context: T) -> Self::Connection;
}

/// Produces [`ConnectionProxy`] values around connections from a connect function.
///
/// The connect function is called exactly once per created connection. It may
/// return fresh connections or handles to a shared one; the factory makes no
/// assumption either way.
pub struct LoggingConnectionFactory<C: DbConnection, T = ()> {
    hook: Arc<dyn SqlHook<C, T>>,
    connect: ConnectFn<C>,
}

impl<C: DbConnection, T> LoggingConnectionFactory<C, T> {
    /// Create a factory that logs through a [`LoggingHook`].
    pub fn new<F>(
        logger_factory: Arc<dyn LoggerFactory>,
        config: LoggingConfig<C>,
        connect: F,
    ) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: 'static,
        C::Command: DbCommand<Connection = C>,
        T: Serialize + 'static,
    {
        Self::from_connect_fn(logger_factory, config, Arc::new(connect))
    }

    pub(crate) fn from_connect_fn(
        logger_factory: Arc<dyn LoggerFactory>,
        config: LoggingConfig<C>,
        connect: ConnectFn<C>,
    ) -> Self
    where
        C: 'static,
        C::Command: DbCommand<Connection = C>,
        T: Serialize + 'static,
    {
        let hook: Arc<dyn SqlHook<C, T>> = Arc::new(LoggingHook::new(logger_factory, config));
        Self { hook, connect }
    }

    /// Create a factory reporting to a custom hook.
    pub fn with_hook<F>(hook: Arc<dyn SqlHook<C, T>>, connect: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self {
            hook,
            connect: Arc::new(connect),
        }
    }

    /// Create a connection proxy bound to `context`.
    pub fn create_connection_with(&self, context: T) -> ConnectionProxy<C, T> {
        let connection = (self.connect)();
        ConnectionProxy::new(connection, Arc::clone(&self.hook), context)
    }

    pub fn hook(&self) -> &Arc<dyn SqlHook<C, T>> {
        &self.hook
    }
}

impl<C: DbConnection> LoggingConnectionFactory<C, ()> {
    /// Create a connection proxy without context.
    pub fn create_connection(&self) -> ConnectionProxy<C, ()> {
        self.create_connection_with(())
    }
}

impl<C: DbConnection> DbConnectionFactory for LoggingConnectionFactory<C, ()> {
    type Connection = ConnectionProxy<C, ()>;

    fn create_connection(&self) -> Self::Connection {
        LoggingConnectionFactory::create_connection(self)
    }
}

impl<C: DbConnection, T> ContextualDbConnectionFactory<T> for LoggingConnectionFactory<C, T> {
    type Connection = ConnectionProxy<C, T>;

    fn create_connection_with(&self, context: T) -> Self::Connection {
        LoggingConnectionFactory::create_connection_with(self, context)
    }
}

impl<C: DbConnection, T> Clone for LoggingConnectionFactory<C, T> {
    fn clone(&self) -> Self {
        Self {
            hook: Arc::clone(&self.hook),
            connect: Arc::clone(&self.connect),
        }
    }
}

impl<C: DbConnection, T> fmt::Debug for LoggingConnectionFactory<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConnectionFactory")
            .finish_non_exhaustive()
    }
}
