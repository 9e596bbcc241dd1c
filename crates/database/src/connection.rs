use crate::error::DbError;
use crate::statement::{migration_preamble, set_schema_sql, Statement, StatementKind};
use async_trait::async_trait;
use configuration::HanaBinding;
use core_types::Book;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::Connection;

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(Vec<Book>),
    Affected(u64),
}

/// Opens database sessions. The gateway owns exactly one provider.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn open(&self) -> Result<Box<dyn Session>, DbError>;
}

/// A single open connection, used for one gateway call and then closed.
#[async_trait]
pub trait Session: Send {
    async fn set_schema(&mut self, schema: &str) -> Result<(), DbError>;

    async fn run(&mut self, statement: &Statement) -> Result<QueryOutcome, DbError>;

    async fn close(self: Box<Self>) -> Result<(), DbError>;
}

/// Connects to PostgreSQL with the credentials of the `hana` binding.
#[derive(Debug, Clone)]
pub struct PgConnectionProvider {
    options: PgConnectOptions,
}

impl PgConnectionProvider {
    /// Builds the connect options once. No connection is opened here.
    pub fn new(binding: &HanaBinding) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&binding.host)
            .port(binding.port)
            .username(&binding.user)
            .password(&binding.password)
            .ssl_mode(if binding.encrypt {
                PgSslMode::Require
            } else {
                PgSslMode::Prefer
            });
        if let Some(database) = &binding.database {
            options = options.database(database);
        }
        Self { options }
    }

    async fn connect(&self) -> Result<PgConnection, DbError> {
        Ok(PgConnection::connect_with(&self.options).await?)
    }
}

#[async_trait]
impl ConnectionProvider for PgConnectionProvider {
    async fn open(&self) -> Result<Box<dyn Session>, DbError> {
        let conn = self.connect().await?;
        Ok(Box::new(PgSession { conn }))
    }
}

struct PgSession {
    conn: PgConnection,
}

#[async_trait]
impl Session for PgSession {
    async fn set_schema(&mut self, schema: &str) -> Result<(), DbError> {
        sqlx::query(&set_schema_sql(schema))
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    async fn run(&mut self, statement: &Statement) -> Result<QueryOutcome, DbError> {
        match statement.kind() {
            StatementKind::Query => {
                let mut query = sqlx::query_as::<_, Book>(statement.sql());
                for param in statement.params() {
                    query = query.bind(param.clone());
                }
                let rows = query.fetch_all(&mut self.conn).await?;
                Ok(QueryOutcome::Rows(rows))
            }
            StatementKind::Command => {
                let mut query = sqlx::query(statement.sql());
                for param in statement.params() {
                    query = query.bind(param.clone());
                }
                let result = query.execute(&mut self.conn).await?;
                Ok(QueryOutcome::Affected(result.rows_affected()))
            }
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        self.conn.close().await?;
        Ok(())
    }
}

/// Creates the configured schema if needed and applies the embedded
/// migrations inside it.
///
/// Uses its own short-lived connection, outside the gateway.
pub async fn run_migrations(binding: &HanaBinding) -> Result<(), DbError> {
    let provider = PgConnectionProvider::new(binding);
    let mut conn = provider.connect().await?;

    for sql in migration_preamble(&binding.schema) {
        sqlx::query(&sql).execute(&mut conn).await?;
    }
    let migrated = sqlx::migrate!("./migrations").run(&mut conn).await;
    let closed = conn.close().await;

    migrated?;
    closed?;
    Ok(())
}
