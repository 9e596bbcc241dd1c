//! Migration tests against a live PostgreSQL server.
//!
//! Set `BOOKSTORE_TEST_PG_HOST` (and optionally `_PORT`, `_USER`, `_PASSWORD`,
//! `_DATABASE`) to run them; without it they return early.

use configuration::HanaBinding;
use core_types::{Book, StagePolicy};
use database::{run_migrations, DbRepository, Gateway};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn test_binding(schema: &str) -> Option<HanaBinding> {
    let host = std::env::var("BOOKSTORE_TEST_PG_HOST").ok()?;
    let var = |key: &str, default: &str| {
        std::env::var(format!("BOOKSTORE_TEST_PG_{}", key)).unwrap_or_else(|_| default.to_string())
    };
    Some(HanaBinding {
        host,
        port: var("PORT", "5432").parse().ok()?,
        schema: schema.to_string(),
        user: var("USER", "postgres"),
        password: var("PASSWORD", "postgres"),
        database: std::env::var("BOOKSTORE_TEST_PG_DATABASE").ok(),
        encrypt: false,
    })
}

fn fresh_schema_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("bookstore_migrate_{}_{}", std::process::id(), nanos)
}

async fn drop_schema(binding: &HanaBinding) {
    let mut options = PgConnectOptions::new()
        .host(&binding.host)
        .port(binding.port)
        .username(&binding.user)
        .password(&binding.password);
    if let Some(database) = &binding.database {
        options = options.database(database);
    }
    let mut conn = PgConnection::connect_with(&options).await.unwrap();
    let sql = format!(r#"DROP SCHEMA IF EXISTS "{}" CASCADE"#, binding.schema);
    sqlx::query(&sql).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();
}

#[tokio::test]
async fn migrate_creates_missing_schema_and_books_relation() {
    let schema = fresh_schema_name();
    let Some(binding) = test_binding(&schema) else {
        eprintln!("BOOKSTORE_TEST_PG_HOST not set; skipping live migration test");
        return;
    };

    run_migrations(&binding).await.unwrap();
    // A second run finds everything applied.
    run_migrations(&binding).await.unwrap();

    let repo = DbRepository::new(Arc::new(Gateway::configure(
        &binding,
        StagePolicy::ShortCircuit,
    )));
    let book = Book {
        id: "1".into(),
        title: "Dune".into(),
        author: "Herbert".into(),
    };
    let inserted = repo.insert_book(&book).await;
    let listed = repo.list_books().await;

    drop_schema(&binding).await;

    assert_eq!(inserted.unwrap(), 1);
    assert_eq!(listed.unwrap(), vec![book]);
}
