//! Registration of logging connection factories with a lifetime policy.
//!
//! ```rust,ignore
//! use dblog::{Lifetime, TracingLoggerFactory, register};
//! use std::sync::Arc;
//!
//! let registration = register(Arc::new(TracingLoggerFactory), || SqliteConnection::new("app.db"))
//!     .configure(|c| Some(c.with_log_level(tracing::Level::DEBUG)))
//!     .lifetime(Lifetime::Singleton)
//!     .build();
//!
//! let factory = registration.resolve();
//! let mut conn = factory.create_connection();
//! ```

use crate::config::{LoggingConfig, LoggingConfigBuilder};
use crate::driver::{DbCommand, DbConnection};
use crate::factory::{ConnectFn, LoggingConnectionFactory};
use crate::logger::LoggerFactory;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// How long a resolved factory lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// One factory for the whole registration.
    #[default]
    Singleton,
    /// One factory per [`Scope`]. Resolving outside a scope uses a root instance.
    Scoped,
    /// A new factory for every resolve.
    Transient,
}

/// Start registering a context-free logging connection factory.
pub fn register<C, F>(
    logger_factory: Arc<dyn LoggerFactory>,
    connect: F,
) -> RegistrationBuilder<C, ()>
where
    C: DbConnection,
    F: Fn() -> C + Send + Sync + 'static,
{
    RegistrationBuilder::new(logger_factory, Arc::new(connect))
}

/// Start registering a logging connection factory carrying context `T`.
pub fn register_with_context<T, C, F>(
    logger_factory: Arc<dyn LoggerFactory>,
    connect: F,
) -> RegistrationBuilder<C, T>
where
    C: DbConnection,
    F: Fn() -> C + Send + Sync + 'static,
{
    RegistrationBuilder::new(logger_factory, Arc::new(connect))
}

/// Collects configuration and lifetime before producing a [`Registration`].
pub struct RegistrationBuilder<C: DbConnection, T> {
    logger_factory: Arc<dyn LoggerFactory>,
    connect: ConnectFn<C>,
    config: LoggingConfigBuilder<C>,
    lifetime: Lifetime,
    _context: std::marker::PhantomData<fn(T)>,
}

impl<C: DbConnection, T> RegistrationBuilder<C, T> {
    fn new(logger_factory: Arc<dyn LoggerFactory>, connect: ConnectFn<C>) -> Self {
        Self {
            logger_factory,
            connect,
            config: LoggingConfigBuilder::default(),
            lifetime: Lifetime::default(),
            _context: std::marker::PhantomData,
        }
    }

    /// Customize the logging configuration.
    ///
    /// `configure` receives a default builder and may return it modified or
    /// return a new one. Returning `None` keeps the defaults, the same as never
    /// calling this method.
    pub fn configure<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(LoggingConfigBuilder<C>) -> Option<LoggingConfigBuilder<C>>,
    {
        self.config = configure(LoggingConfigBuilder::default()).unwrap_or_default();
        self
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn build(self) -> Registration<C, T> {
        Registration {
            logger_factory: self.logger_factory,
            connect: self.connect,
            config: self.config.build(),
            lifetime: self.lifetime,
            root: OnceLock::new(),
        }
    }
}

/// A registered factory recipe that hands out factories per its [`Lifetime`].
pub struct Registration<C: DbConnection, T = ()> {
    logger_factory: Arc<dyn LoggerFactory>,
    connect: ConnectFn<C>,
    config: LoggingConfig<C>,
    lifetime: Lifetime,
    root: OnceLock<Arc<LoggingConnectionFactory<C, T>>>,
}

impl<C, T> Registration<C, T>
where
    C: DbConnection + 'static,
    C::Command: DbCommand<Connection = C>,
    T: Serialize + 'static,
{
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn config(&self) -> &LoggingConfig<C> {
        &self.config
    }

    /// Resolve a factory from the root.
    pub fn resolve(&self) -> Arc<LoggingConnectionFactory<C, T>> {
        match self.lifetime {
            Lifetime::Singleton | Lifetime::Scoped => {
                Arc::clone(self.root.get_or_init(|| Arc::new(self.make())))
            }
            Lifetime::Transient => Arc::new(self.make()),
        }
    }

    /// Open a scope for [`Lifetime::Scoped`] resolution.
    pub fn scope(&self) -> Scope<'_, C, T> {
        Scope {
            registration: self,
            instance: OnceLock::new(),
        }
    }

    fn make(&self) -> LoggingConnectionFactory<C, T> {
        LoggingConnectionFactory::from_connect_fn(
            Arc::clone(&self.logger_factory),
            self.config.clone(),
            Arc::clone(&self.connect),
        )
    }
}

impl<C: DbConnection, T> fmt::Debug for Registration<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("lifetime", &self.lifetime)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A resolution scope; scoped factories are shared within one scope only.
pub struct Scope<'a, C: DbConnection, T> {
    registration: &'a Registration<C, T>,
    instance: OnceLock<Arc<LoggingConnectionFactory<C, T>>>,
}

impl<C, T> Scope<'_, C, T>
where
    C: DbConnection + 'static,
    C::Command: DbCommand<Connection = C>,
    T: Serialize + 'static,
{
    pub fn resolve(&self) -> Arc<LoggingConnectionFactory<C, T>> {
        match self.registration.lifetime {
            Lifetime::Scoped => {
                Arc::clone(self.instance.get_or_init(|| Arc::new(self.registration.make())))
            }
            Lifetime::Singleton | Lifetime::Transient => self.registration.resolve(),
        }
    }
}
