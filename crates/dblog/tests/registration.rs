//! Registration, configuration delegates and factory lifetimes.

mod common;

use common::{StubConnection, TestLoggerFactory};
use dblog::config::DEFAULT_EXECUTE_QUERY_MESSAGE;
use dblog::{
    DbCommand, DbConnection, Lifetime, LoggingConfigBuilder, LoggingSettings, register,
    register_with_context,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;

fn run_one_query(conn: &mut impl DbConnection) {
    assert!(conn.open().is_ok());
    let mut cmd = conn.create_command().ok().unwrap();
    cmd.set_text("select * from users where id = @id".into());
    cmd.parameters_mut().add("@id", 1);
    assert!(cmd.execute_non_query().is_ok());
}

#[test]
fn fluent_configuration() {
    let loggers = TestLoggerFactory::new();
    let registration = register(Arc::new(loggers.clone()), StubConnection::default)
        .configure(|c| {
            Some(
                c.with_log_level(Level::DEBUG)
                    .with_sensitive_data_logging()
                    .with_execute_query_message("sql: {query} [{params}]"),
            )
        })
        .build();

    let factory = registration.resolve();
    let mut conn = factory.create_connection();
    run_one_query(&mut conn);

    let records = loggers.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.level == Level::DEBUG));
    assert_eq!(
        records[1].message,
        "sql: select * from users where id = @id [@id=1]"
    );
}

#[test]
fn configuration_delegate_may_return_a_new_builder() {
    let loggers = TestLoggerFactory::new();
    let registration = register(Arc::new(loggers.clone()), StubConnection::default)
        .configure(|_| {
            Some(LoggingConfigBuilder {
                log_level: Some(Level::WARN),
                log_sensitive_data: true,
                ..Default::default()
            })
        })
        .build();

    assert_eq!(registration.config().level, Level::WARN);
    assert!(registration.config().log_sensitive_data);
    assert_eq!(
        registration.config().execute_query_message,
        DEFAULT_EXECUTE_QUERY_MESSAGE
    );

    let mut conn = registration.resolve().create_connection();
    run_one_query(&mut conn);
    assert!(loggers.records()[1].message.contains("@id=1"));
}

#[test]
fn no_configuration_uses_defaults() {
    let loggers = TestLoggerFactory::new();
    let registration = register(Arc::new(loggers.clone()), StubConnection::default).build();

    assert_eq!(registration.config().level, Level::INFO);
    assert!(!registration.config().log_sensitive_data);

    let mut conn = registration.resolve().create_connection();
    run_one_query(&mut conn);
    let records = loggers.records();
    assert!(records[0].message.contains("open"));
    assert!(records[1].message.contains("@id=?"));
}

#[test]
fn delegate_returning_none_uses_defaults() {
    let loggers = TestLoggerFactory::new();
    let registration = register(Arc::new(loggers.clone()), StubConnection::default)
        .configure(|c| {
            let _ = c.with_log_level(Level::ERROR);
            None
        })
        .build();

    assert_eq!(registration.config().level, Level::INFO);

    let mut conn = registration.resolve().create_connection();
    run_one_query(&mut conn);
    assert_eq!(loggers.records().len(), 2);
}

#[test]
fn settings_file_feeds_the_builder() {
    #[derive(serde::Deserialize)]
    struct AppConfig {
        dblog: LoggingSettings,
    }

    let file: AppConfig = toml::from_str(
        r#"
        [dblog]
        level = "debug"
        log_sensitive_data = true
        command_category = "app::sql"
        "#,
    )
    .unwrap();

    let loggers = TestLoggerFactory::new();
    let registration = register(Arc::new(loggers.clone()), StubConnection::default)
        .configure(|c| Some(c.with_settings(&file.dblog)))
        .build();

    let mut conn = registration.resolve().create_connection();
    run_one_query(&mut conn);

    let sql = loggers.logger("app::sql").unwrap().records();
    assert_eq!(sql.len(), 1);
    assert_eq!(sql[0].level, Level::DEBUG);
    assert!(sql[0].message.contains("@id=1"));
}

#[test]
fn singleton_resolves_the_same_factory() {
    let registration = register(Arc::new(TestLoggerFactory::new()), StubConnection::default).build();

    assert_eq!(registration.lifetime(), Lifetime::Singleton);
    let a = registration.resolve();
    let b = registration.resolve();
    let scope = registration.scope();
    let c = scope.resolve();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &c));
}

#[test]
fn transient_resolves_a_new_factory_each_time() {
    let registration = register(Arc::new(TestLoggerFactory::new()), StubConnection::default)
        .lifetime(Lifetime::Transient)
        .build();

    let a = registration.resolve();
    let b = registration.resolve();
    let scope = registration.scope();
    let c = scope.resolve();
    let d = scope.resolve();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&c, &d));
}

#[test]
fn scoped_resolves_one_factory_per_scope() {
    let registration = register(Arc::new(TestLoggerFactory::new()), StubConnection::default)
        .lifetime(Lifetime::Scoped)
        .build();

    let first = registration.scope();
    let second = registration.scope();
    let a1 = first.resolve();
    let a2 = first.resolve();
    let b1 = second.resolve();

    assert!(Arc::ptr_eq(&a1, &a2));
    assert!(!Arc::ptr_eq(&a1, &b1));
    assert!(Arc::ptr_eq(&registration.resolve(), &registration.resolve()));
}

#[test]
fn resolved_factories_share_the_connect_function() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let registration = register(Arc::new(TestLoggerFactory::new()), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        StubConnection::default()
    })
    .lifetime(Lifetime::Transient)
    .build();

    let _ = registration.resolve().create_connection();
    let _ = registration.resolve().create_connection();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn registration_with_context() {
    let loggers = TestLoggerFactory::new();
    let registration =
        register_with_context::<String, _, _>(Arc::new(loggers.clone()), StubConnection::default)
            .configure(|c| Some(c.with_command_category("sql")))
            .build();

    let factory = registration.resolve();
    let mut conn = factory.create_connection_with("req-9".to_string());
    run_one_query(&mut conn);

    for record in loggers.records() {
        assert_eq!(
            record.get(dblog::logger::keys::CONTEXT),
            Some(&serde_json::json!("req-9"))
        );
    }
    assert!(loggers.logger("sql").is_some());
}
