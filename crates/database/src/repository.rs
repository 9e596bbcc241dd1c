use crate::connection::QueryOutcome;
use crate::error::{DbError, GatewayError};
use crate::gateway::Gateway;
use crate::statement::Statement;
use core_types::{Book, Stage};
use std::sync::Arc;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It owns the books statements and hands them to the gateway.
#[derive(Debug, Clone)]
pub struct DbRepository {
    gateway: Arc<Gateway>,
}

impl DbRepository {
    /// Creates a new `DbRepository` over the shared gateway.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Fetches every row of the books relation.
    pub async fn list_books(&self) -> Result<Vec<Book>, GatewayError> {
        match self.gateway.execute(&Statement::select_books()).await? {
            QueryOutcome::Rows(books) => Ok(books),
            QueryOutcome::Affected(_) => Err(GatewayError::new(
                Stage::Execute,
                DbError::UnexpectedOutcome("rows"),
            )),
        }
    }

    /// Inserts one book and returns the number of rows written.
    pub async fn insert_book(&self, book: &Book) -> Result<u64, GatewayError> {
        match self.gateway.execute(&Statement::insert_book(book)).await? {
            QueryOutcome::Affected(count) => Ok(count),
            QueryOutcome::Rows(_) => Err(GatewayError::new(
                Stage::Execute,
                DbError::UnexpectedOutcome("an affected-row count"),
            )),
        }
    }

    /// Runs a trivial statement to prove the binding can be used end to end.
    pub async fn check(&self) -> Result<(), GatewayError> {
        self.gateway.execute(&Statement::ping()).await?;
        Ok(())
    }
}
