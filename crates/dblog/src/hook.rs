use crate::driver::DbConnection;
use std::fmt;
use std::sync::Arc;

/// Callbacks invoked by the proxies after a delegated operation succeeds.
///
/// `T` is the caller-supplied context type; `()` is used when there is none.
/// Every callback receives the *real* object (never the proxy), the context
/// bound to the connection, and the elapsed time of the delegated call in
/// milliseconds.
///
/// Callbacks are not invoked when the delegated operation fails.
///
/// # Panics
///
/// The proxies do not catch panics raised by a hook. A panicking hook unwinds
/// through the proxied call, so a logging failure shows up as a failure of an
/// otherwise successful database call and cannot be told apart from a driver
/// panic. Implementations should not panic under normal operation.
///
/// Hooks are shared across threads and proxies; any internal mutable state must
/// be synchronized by the implementation.
pub trait SqlHook<C: DbConnection, T>: Send + Sync {
    /// Called after `open` returns successfully.
    fn connection_opened(&self, connection: &C, context: &T, elapsed_ms: f64);

    /// Called after `close` returns successfully.
    fn connection_closed(&self, connection: &C, context: &T, elapsed_ms: f64);

    /// Called after any `execute_*` variant returns successfully.
    ///
    /// Hooks read text and parameters from `command` itself.
    fn command_executed(&self, command: &C::Command, context: &T, elapsed_ms: f64);
}

impl<C: DbConnection, T, H: SqlHook<C, T> + ?Sized> SqlHook<C, T> for Arc<H> {
    fn connection_opened(&self, connection: &C, context: &T, elapsed_ms: f64) {
        (**self).connection_opened(connection, context, elapsed_ms);
    }

    fn connection_closed(&self, connection: &C, context: &T, elapsed_ms: f64) {
        (**self).connection_closed(connection, context, elapsed_ms);
    }

    fn command_executed(&self, command: &C::Command, context: &T, elapsed_ms: f64) {
        (**self).command_executed(command, context, elapsed_ms);
    }
}

/// A hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl<C: DbConnection, T> SqlHook<C, T> for NoopHook {
    fn connection_opened(&self, _: &C, _: &T, _: f64) {}

    fn connection_closed(&self, _: &C, _: &T, _: f64) {}

    fn command_executed(&self, _: &C::Command, _: &T, _: f64) {}
}

/// The hook and context bound to one logical connection.
///
/// Created once per connection proxy and shared by `Arc` with every command
/// proxy it creates. Never mutated after construction.
pub struct HookBinding<C: DbConnection, T> {
    hook: Arc<dyn SqlHook<C, T>>,
    context: T,
}

impl<C: DbConnection, T> HookBinding<C, T> {
    pub fn new(hook: Arc<dyn SqlHook<C, T>>, context: T) -> Self {
        Self { hook, context }
    }

    pub fn hook(&self) -> &dyn SqlHook<C, T> {
        &*self.hook
    }

    pub fn context(&self) -> &T {
        &self.context
    }

    pub(crate) fn opened(&self, connection: &C, elapsed_ms: f64) {
        self.hook
            .connection_opened(connection, &self.context, elapsed_ms);
    }

    pub(crate) fn closed(&self, connection: &C, elapsed_ms: f64) {
        self.hook
            .connection_closed(connection, &self.context, elapsed_ms);
    }

    pub(crate) fn executed(&self, command: &C::Command, elapsed_ms: f64) {
        self.hook.command_executed(command, &self.context, elapsed_ms);
    }
}

impl<C: DbConnection, T: fmt::Debug> fmt::Debug for HookBinding<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("hook", &"<dyn SqlHook>")
            .field("context", &self.context)
            .finish()
    }
}
