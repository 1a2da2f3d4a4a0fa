//! Logging proxies for connections and commands.
//!
//! [`ConnectionProxy`] and [`CommandProxy`] implement [`DbConnection`] and
//! [`DbCommand`] by forwarding to the wrapped object. Only `open`, `close`,
//! `create_command` and the `execute_*` family are intercepted: each is timed
//! around the delegated call and, if it succeeds, reported to the bound
//! [`SqlHook`]. Errors are returned unchanged and produce no event.
//!
//! # Example
//!
//! ```rust,ignore
//! use dblog::{ConnectionProxy, DbCommand, DbConnection, NoopHook};
//! use std::sync::Arc;
//!
//! let mut conn = ConnectionProxy::new(raw_connection, Arc::new(NoopHook), ());
//! conn.open()?;
//! let mut cmd = conn.create_command()?;
//! cmd.set_text("DELETE FROM sessions WHERE expired".into());
//! let removed = cmd.execute_non_query()?;
//! ```
//!
//! [`DbConnection`]: crate::DbConnection
//! [`DbCommand`]: crate::DbCommand
//! [`SqlHook`]: crate::SqlHook

mod command;
mod connection;


pub use command::CommandProxy;
pub use connection::ConnectionProxy;

use std::time::Instant;

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
