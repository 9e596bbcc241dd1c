use core_types::Stage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Statement produced an unexpected outcome: expected {0}")]
    UnexpectedOutcome(&'static str),
}

/// A failure of one stage of a gateway call.
///
/// The display text is the message surfaced to HTTP callers.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct GatewayError {
    pub stage: Stage,
    #[source]
    pub source: DbError,
}

impl GatewayError {
    pub fn new(stage: Stage, source: impl Into<DbError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
