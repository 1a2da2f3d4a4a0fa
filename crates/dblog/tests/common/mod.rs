//! Shared fixtures for integration tests: a scriptable in-memory driver and a
//! logger factory that keeps every record it receives.

#![allow(dead_code)]

use dblog::{
    CommandType, ConnectionState, DbCommand, DbConnection, LogRecord, Logger, LoggerFactory,
    LoggingConfig, LoggingConnectionFactory, Parameters, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;

// ── Stub driver ──

#[derive(Debug, Clone, PartialEq)]
pub struct StubError(pub String);

/// A connection whose behavior is fixed at construction.
#[derive(Debug, Clone)]
pub struct StubConnection {
    pub data_source: String,
    pub fail_execute: bool,
    state: ConnectionState,
}

impl StubConnection {
    pub fn new(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            fail_execute: false,
            state: ConnectionState::Closed,
        }
    }

    pub fn failing_execute() -> Self {
        Self {
            fail_execute: true,
            ..Self::default()
        }
    }
}

impl Default for StubConnection {
    fn default() -> Self {
        Self::new("stub")
    }
}

impl DbConnection for StubConnection {
    type Command = StubCommand;
    type Error = StubError;

    fn open(&mut self) -> Result<(), StubError> {
        self.state = ConnectionState::Open;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StubError> {
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn create_command(&self) -> Result<StubCommand, StubError> {
        Ok(StubCommand {
            connection: self.clone(),
            text: String::new(),
            command_type: CommandType::Text,
            timeout: None,
            parameters: Parameters::new(),
        })
    }

    fn connection_string(&self) -> &str {
        "Data Source=stub"
    }

    fn database(&self) -> &str {
        "main"
    }

    fn data_source(&self) -> &str {
        &self.data_source
    }

    fn state(&self) -> ConnectionState {
        self.state
    }
}

#[derive(Debug, Clone)]
pub struct StubCommand {
    connection: StubConnection,
    text: String,
    command_type: CommandType,
    timeout: Option<Duration>,
    parameters: Parameters,
}

impl StubCommand {
    fn run(&self) -> Result<(), StubError> {
        if self.connection.fail_execute {
            Err(StubError(format!("cannot execute {}", self.text)))
        } else {
            Ok(())
        }
    }
}

impl DbCommand for StubCommand {
    type Connection = StubConnection;
    type Reader = Vec<Vec<Value>>;
    type Error = StubError;

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

    fn connection(&self) -> &StubConnection {
        &self.connection
    }

    fn prepare(&self) -> Result<(), StubError> {
        Ok(())
    }

    fn execute_non_query(&self) -> Result<u64, StubError> {
        self.run()?;
        Ok(1)
    }

    fn execute_reader(&self) -> Result<Vec<Vec<Value>>, StubError> {
        self.run()?;
        Ok(vec![vec![Value::Int(1)]])
    }

    fn execute_scalar(&self) -> Result<Option<Value>, StubError> {
        self.run()?;
        Ok(Some(Value::Int(1)))
    }
}

// ── Recording logger factory ──

/// A logger that keeps its records.
pub struct TestLogger {
    pub category: String,
    max_level: Level,
    records: Mutex<Vec<LogRecord>>,
}

impl TestLogger {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }
}

impl Logger for TestLogger {
    fn is_enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    fn log(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Hands out [`TestLogger`]s and remembers them in creation order.
#[derive(Clone)]
pub struct TestLoggerFactory {
    max_level: Level,
    loggers: Arc<Mutex<Vec<Arc<TestLogger>>>>,
    created: Arc<AtomicUsize>,
}

impl TestLoggerFactory {
    pub fn new() -> Self {
        Self::with_max_level(Level::TRACE)
    }

    /// Loggers report levels more verbose than `max_level` as disabled.
    pub fn with_max_level(max_level: Level) -> Self {
        Self {
            max_level,
            loggers: Arc::default(),
            created: Arc::default(),
        }
    }

    pub fn loggers(&self) -> Vec<Arc<TestLogger>> {
        self.loggers.lock().unwrap().clone()
    }

    pub fn logger(&self, category: &str) -> Option<Arc<TestLogger>> {
        self.loggers()
            .into_iter()
            .find(|l| l.category == category)
    }

    /// Every record from every logger, in logger creation order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.loggers()
            .iter()
            .flat_map(|l| l.records())
            .collect()
    }

    /// Number of `create_logger` calls so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl LoggerFactory for TestLoggerFactory {
    fn create_logger(&self, category: &str) -> Arc<dyn Logger> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let logger = Arc::new(TestLogger {
            category: category.to_string(),
            max_level: self.max_level,
            records: Mutex::new(Vec::new()),
        });
        self.loggers.lock().unwrap().push(Arc::clone(&logger));
        logger
    }
}

/// A context-free factory over [`StubConnection`] logging to `loggers`.
pub fn stub_factory(
    loggers: &TestLoggerFactory,
    config: LoggingConfig<StubConnection>,
) -> LoggingConnectionFactory<StubConnection> {
    LoggingConnectionFactory::new(Arc::new(loggers.clone()), config, StubConnection::default)
}
