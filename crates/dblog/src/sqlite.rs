//! SQLite driver adapter over `rusqlite`.
//!
//! Enable via the crate feature: `dblog = { features = ["sqlite"] }` (on by default).
//!
//! Parameters bind by name (`:id`, `@id` and `$id` are tried when the name has
//! no prefix) or by position when unnamed. Readers are fully buffered.

use crate::driver::{CommandType, ConnectionState, DbCommand, DbConnection};
use crate::error::{DbError, DbResult};
use crate::value::{Parameters, Value};
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PARAM_PREFIXES: [char; 3] = [':', '@', '$'];

/// Busy timeout used when a command sets none; matches `rusqlite`'s default.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A SQLite connection handle.
///
/// Clones share the same underlying connection, so a connect function may
/// hand out clones of one handle.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    path: String,
    inner: Arc<Mutex<Option<rusqlite::Connection>>>,
}

impl SqliteConnection {
    /// A connection to the database file at `path`. Not opened yet.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// A connection to a private in-memory database. Not opened yet.
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }
}

impl DbConnection for SqliteConnection {
    type Command = SqliteCommand;
    type Error = DbError;

    fn open(&mut self) -> DbResult<()> {
        let mut slot = self.inner.lock()?;
        if slot.is_some() {
            return Err(DbError::AlreadyOpen);
        }
        *slot = Some(rusqlite::Connection::open(&self.path)?);
        Ok(())
    }

    fn close(&mut self) -> DbResult<()> {
        let mut slot = self.inner.lock()?;
        match slot.take() {
            Some(conn) => conn.close().map_err(|(conn, err)| {
                *slot = Some(conn);
                DbError::from(err)
            }),
            None => Ok(()),
        }
    }

    fn create_command(&self) -> DbResult<SqliteCommand> {
        Ok(SqliteCommand::new(self.clone()))
    }

    fn connection_string(&self) -> &str {
        &self.path
    }

    fn database(&self) -> &str {
        "main"
    }

    fn data_source(&self) -> &str {
        &self.path
    }

    fn state(&self) -> ConnectionState {
        let open = match self.inner.lock() {
            Ok(slot) => slot.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        };
        if open {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }
}

/// A command against a [`SqliteConnection`].
#[derive(Debug, Clone)]
pub struct SqliteCommand {
    connection: SqliteConnection,
    text: String,
    command_type: CommandType,
    timeout: Option<Duration>,
    parameters: Parameters,
}

impl SqliteCommand {
    fn new(connection: SqliteConnection) -> Self {
        Self {
            connection,
            text: String::new(),
            command_type: CommandType::Text,
            timeout: None,
            parameters: Parameters::new(),
        }
    }

    fn sql(&self) -> DbResult<Cow<'_, str>> {
        match self.command_type {
            CommandType::Text => Ok(Cow::Borrowed(&self.text)),
            CommandType::TableDirect => Ok(Cow::Owned(format!(
                "SELECT * FROM \"{}\"",
                self.text.replace('"', "\"\"")
            ))),
            CommandType::StoredProcedure => {
                Err(DbError::other("SQLite does not support stored procedures"))
            }
        }
    }

    fn with_connection<R>(
        &self,
        f: impl FnOnce(&rusqlite::Connection) -> rusqlite::Result<R>,
    ) -> DbResult<R> {
        let slot = self.connection.inner.lock()?;
        let conn = slot.as_ref().ok_or(DbError::NotOpen)?;
        // The busy timeout is connection-wide; reset it on every call.
        conn.busy_timeout(self.timeout.unwrap_or(DEFAULT_BUSY_TIMEOUT))?;
        Ok(f(conn)?)
    }

    fn bind(&self, stmt: &mut rusqlite::Statement<'_>) -> rusqlite::Result<()> {
        let mut position = 0;
        for param in &self.parameters {
            let index = match param.name.as_deref() {
                Some(name) if !name.is_empty() => named_index(stmt, name)?,
                _ => {
                    position += 1;
                    position
                }
            };
            stmt.raw_bind_parameter(index, &param.value)?;
        }
        Ok(())
    }
}

fn named_index(stmt: &rusqlite::Statement<'_>, name: &str) -> rusqlite::Result<usize> {
    if let Some(index) = stmt.parameter_index(name)? {
        return Ok(index);
    }
    if !name.starts_with(PARAM_PREFIXES) {
        for prefix in PARAM_PREFIXES {
            if let Some(index) = stmt.parameter_index(&format!("{prefix}{name}"))? {
                return Ok(index);
            }
        }
    }
    Err(rusqlite::Error::InvalidParameterName(name.to_string()))
}

impl DbCommand for SqliteCommand {
    type Connection = SqliteConnection;
    type Reader = SqliteReader;
    type Error = DbError;

    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }

    fn command_type(&self) -> CommandType {
        self.command_type
    }

    fn set_command_type(&mut self, command_type: CommandType) {
        self.command_type = command_type;
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn connection(&self) -> &SqliteConnection {
        &self.connection
    }

    fn prepare(&self) -> DbResult<()> {
        let sql = self.sql()?;
        self.with_connection(|conn| conn.prepare(&sql).map(drop))
    }

    fn execute_non_query(&self) -> DbResult<u64> {
        let sql = self.sql()?;
        let affected = self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            self.bind(&mut stmt)?;
            stmt.raw_execute()
        })?;
        Ok(affected as u64)
    }

    fn execute_reader(&self) -> DbResult<SqliteReader> {
        let sql = self.sql()?;
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            self.bind(&mut stmt)?;
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            let width = columns.len();

            let mut out = Vec::new();
            let mut rows = stmt.raw_query();
            while let Some(row) = rows.next()? {
                let values = (0..width)
                    .map(|i| row.get_ref(i).map(Value::from))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                out.push(values);
            }
            Ok(SqliteReader { columns, rows: out })
        })
    }

    fn execute_scalar(&self) -> DbResult<Option<Value>> {
        let sql = self.sql()?;
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            self.bind(&mut stmt)?;
            let mut rows = stmt.raw_query();
            let value = match rows.next()? {
                Some(row) => Some(Value::from(row.get_ref(0)?)),
                None => None,
            };
            Ok(value)
        })
    }
}

/// A buffered result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqliteReader {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl SqliteReader {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Value at `row`, `column`.
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for SqliteReader {
    type Item = Vec<Value>;
    type IntoIter = std::vec::IntoIter<Vec<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Int(n) => ToSqlOutput::Owned(SqlValue::Integer(*n)),
            Value::Float(x) => ToSqlOutput::Owned(SqlValue::Real(*x)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::Int(n),
            ValueRef::Real(x) => Value::Float(x),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}
