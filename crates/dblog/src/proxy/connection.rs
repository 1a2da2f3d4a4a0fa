use super::command::CommandProxy;
use super::elapsed_ms;
use crate::driver::{ConnectionState, DbConnection};
use crate::hook::{HookBinding, SqlHook};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// A connection that reports `open`, `close` and command execution to a hook.
///
/// Commands created through the proxy are [`CommandProxy`] values sharing this
/// connection's [`HookBinding`].
pub struct ConnectionProxy<C: DbConnection, T> {
    inner: C,
    binding: Arc<HookBinding<C, T>>,
}

impl<C: DbConnection, T> ConnectionProxy<C, T> {
    /// Wrap `inner`, binding `hook` and `context` for its whole lifetime.
    pub fn new(inner: C, hook: Arc<dyn SqlHook<C, T>>, context: T) -> Self {
        Self {
            inner,
            binding: Arc::new(HookBinding::new(hook, context)),
        }
    }

    /// The hook binding shared with every command created from this proxy.
    pub fn binding(&self) -> &Arc<HookBinding<C, T>> {
        &self.binding
    }

    pub fn context(&self) -> &T {
        self.binding.context()
    }

    /// Get a reference to the real connection.
    ///
    /// Driver-specific members outside [`DbConnection`] are reached through here.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get a mutable reference to the real connection.
    ///
    /// Calls made through this reference bypass the hook.
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Get the real connection, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: DbConnection, T> DbConnection for ConnectionProxy<C, T> {
    type Command = CommandProxy<C, T>;
    type Error = C::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        let start = Instant::now();
        let result = self.inner.open();
        let elapsed = elapsed_ms(start);
        result?;
        self.binding.opened(&self.inner, elapsed);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        let start = Instant::now();
        let result = self.inner.close();
        let elapsed = elapsed_ms(start);
        result?;
        self.binding.closed(&self.inner, elapsed);
        Ok(())
    }

    fn create_command(&self) -> Result<Self::Command, Self::Error> {
        let command = self.inner.create_command()?;
        Ok(CommandProxy::new(command, Arc::clone(&self.binding)))
    }

    fn connection_string(&self) -> &str {
        self.inner.connection_string()
    }

    fn database(&self) -> &str {
        self.inner.database()
    }

    fn data_source(&self) -> &str {
        self.inner.data_source()
    }

    fn state(&self) -> ConnectionState {
        self.inner.state()
    }
}

impl<C, T> fmt::Debug for ConnectionProxy<C, T>
where
    C: DbConnection + fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProxy")
            .field("inner", &self.inner)
            .field("context", self.binding.context())
            .finish()
    }
}
