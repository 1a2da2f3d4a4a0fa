//! Capability traits a database driver must provide to be proxied.
//!
//! The proxies in [`crate::proxy`] implement these same traits, so any code
//! written against `impl DbConnection` accepts a raw connection and a logging
//! proxy alike. Members outside this set stay reachable through
//! [`ConnectionProxy::inner`](crate::ConnectionProxy::inner) and
//! [`CommandProxy::inner`](crate::CommandProxy::inner).

use crate::value::{Parameters, Value};
use std::time::Duration;

/// Whether a connection is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Open,
}

/// How a command's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandType {
    /// Plain SQL text
    #[default]
    Text,
    /// Name of a stored procedure
    StoredProcedure,
    /// Name of a table
    TableDirect,
}

/// A database connection.
pub trait DbConnection {
    /// The command type this connection creates.
    type Command: DbCommand;
    /// The driver's error type.
    type Error;

    /// Open the connection.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Close the connection.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Create a new command bound to this connection.
    fn create_command(&self) -> Result<Self::Command, Self::Error>;

    /// The string used to open the connection.
    fn connection_string(&self) -> &str;

    /// Name of the current database.
    fn database(&self) -> &str;

    /// Server or file the connection points at.
    fn data_source(&self) -> &str;

    fn state(&self) -> ConnectionState;
}

/// A command created from a [`DbConnection`].
pub trait DbCommand {
    /// The connection type that created this command.
    type Connection;
    /// Result of [`DbCommand::execute_reader`].
    type Reader;
    /// The driver's error type.
    type Error;

    fn text(&self) -> &str;

    fn set_text(&mut self, text: String);

    fn command_type(&self) -> CommandType;

    fn set_command_type(&mut self, command_type: CommandType);

    /// Execution timeout. `None` means the driver default.
    fn timeout(&self) -> Option<Duration>;

    fn set_timeout(&mut self, timeout: Option<Duration>);

    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    /// The connection this command executes against.
    fn connection(&self) -> &Self::Connection;

    /// Prepare (compile) the command ahead of execution.
    fn prepare(&self) -> Result<(), Self::Error>;

    /// Execute and return the number of affected rows.
    fn execute_non_query(&self) -> Result<u64, Self::Error>;

    /// Execute and return a reader over the result set.
    fn execute_reader(&self) -> Result<Self::Reader, Self::Error>;

    /// Execute and return the first column of the first row, `None` if there are no rows.
    fn execute_scalar(&self) -> Result<Option<Value>, Self::Error>;
}
