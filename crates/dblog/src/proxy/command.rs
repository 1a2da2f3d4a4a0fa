use super::elapsed_ms;
use crate::driver::{CommandType, DbCommand, DbConnection};
use crate::hook::HookBinding;
use crate::value::{Parameters, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

type CommandOf<C> = <C as DbConnection>::Command;

/// A command that reports every successful execution to its connection's hook.
///
/// Created by [`ConnectionProxy::create_command`](crate::DbConnection::create_command).
/// The reader returned by `execute_reader` is the driver's own reader; reads
/// from it are not instrumented.
pub struct CommandProxy<C: DbConnection, T> {
    inner: C::Command,
    binding: Arc<HookBinding<C, T>>,
}

impl<C: DbConnection, T> CommandProxy<C, T> {
    pub(crate) fn new(inner: C::Command, binding: Arc<HookBinding<C, T>>) -> Self {
        Self { inner, binding }
    }

    /// The hook binding, identical to the parent connection proxy's.
    pub fn binding(&self) -> &Arc<HookBinding<C, T>> {
        &self.binding
    }

    pub fn context(&self) -> &T {
        self.binding.context()
    }

    /// Get a reference to the real command.
    pub fn inner(&self) -> &C::Command {
        &self.inner
    }

    /// Get a mutable reference to the real command.
    pub fn inner_mut(&mut self) -> &mut C::Command {
        &mut self.inner
    }

    /// Get the real command, consuming this wrapper.
    pub fn into_inner(self) -> C::Command {
        self.inner
    }

    fn instrument<R, E>(
        &self,
        execute: impl FnOnce(&C::Command) -> Result<R, E>,
    ) -> Result<R, E> {
        let start = Instant::now();
        let result = execute(&self.inner);
        let elapsed = elapsed_ms(start);
        let value = result?;
        self.binding.executed(&self.inner, elapsed);
        Ok(value)
    }
}

impl<C: DbConnection, T> DbCommand for CommandProxy<C, T> {
    type Connection = <CommandOf<C> as DbCommand>::Connection;
    type Reader = <CommandOf<C> as DbCommand>::Reader;
    type Error = <CommandOf<C> as DbCommand>::Error;

    fn text(&self) -> &str {
        self.inner.text()
    }

    fn set_text(&mut self, text: String) {
        self.inner.set_text(text);
    }

    fn command_type(&self) -> CommandType {
        self.inner.command_type()
    }

    fn set_command_type(&mut self, command_type: CommandType) {
        self.inner.set_command_type(command_type);
    }

    fn timeout(&self) -> Option<Duration> {
        self.inner.timeout()
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.inner.set_timeout(timeout);
    }

    fn parameters(&self) -> &Parameters {
        self.inner.parameters()
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        self.inner.parameters_mut()
    }

    fn connection(&self) -> &Self::Connection {
        self.inner.connection()
    }

    fn prepare(&self) -> Result<(), Self::Error> {
        self.inner.prepare()
    }

    fn execute_non_query(&self) -> Result<u64, Self::Error> {
        self.instrument(|cmd| cmd.execute_non_query())
    }

    fn execute_reader(&self) -> Result<Self::Reader, Self::Error> {
        self.instrument(|cmd| cmd.execute_reader())
    }

    fn execute_scalar(&self) -> Result<Option<Value>, Self::Error> {
        self.instrument(|cmd| cmd.execute_scalar())
    }
}

impl<C, T> fmt::Debug for CommandProxy<C, T>
where
    C: DbConnection,
    C::Command: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandProxy")
            .field("inner", &self.inner)
            .field("context", self.binding.context())
            .finish()
    }
}
