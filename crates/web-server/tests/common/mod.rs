//! Shared harness for the HTTP tests: an in-memory store behind the gateway traits.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use core_types::{Book, StagePolicy};
use database::statement::StatementKind;
use database::{ConnectionProvider, DbError, Gateway, QueryOutcome, Session, Statement};
use std::sync::{Arc, Mutex};
use web_server::{build_router, AppState};

/// Stages that should fail on the next calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub connect: bool,
    pub execute: bool,
    pub close: bool,
}

#[derive(Default)]
struct StoreState {
    rows: Vec<Book>,
    statements: Vec<Statement>,
    opened: usize,
    faults: Faults,
}

/// A books relation held in memory, reached through the same seams as PostgreSQL.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Book>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().rows = rows;
        store
    }

    pub fn fail(&self, faults: Faults) {
        self.state.lock().unwrap().faults = faults;
    }

    pub fn rows(&self) -> Vec<Book> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.state.lock().unwrap().statements.clone()
    }

    pub fn connections_opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn router(&self, policy: StagePolicy) -> Router {
        let gateway = Arc::new(Gateway::new(Arc::new(self.clone()), "BOOKSTORE", policy));
        build_router(Arc::new(AppState::new(gateway)))
    }
}

fn fault(message: &str) -> DbError {
    DbError::Sqlx(sqlx::Error::Protocol(message.to_string()))
}

#[async_trait]
impl ConnectionProvider for MemoryStore {
    async fn open(&self) -> Result<Box<dyn Session>, DbError> {
        let mut state = self.state.lock().unwrap();
        state.opened += 1;
        if state.faults.connect {
            return Err(fault("connection refused"));
        }
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl Session for MemoryStore {
    async fn set_schema(&mut self, _schema: &str) -> Result<(), DbError> {
        Ok(())
    }

    async fn run(&mut self, statement: &Statement) -> Result<QueryOutcome, DbError> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(statement.clone());
        if state.faults.execute {
            return Err(fault("relation does not exist"));
        }
        match statement.kind() {
            StatementKind::Query => Ok(QueryOutcome::Rows(state.rows.clone())),
            StatementKind::Command => {
                let params = statement.params();
                state.rows.push(Book {
                    id: params[0].clone(),
                    title: params[1].clone(),
                    author: params[2].clone(),
                });
                Ok(QueryOutcome::Affected(1))
            }
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DbError> {
        if self.state.lock().unwrap().faults.close {
            return Err(fault("connection reset"));
        }
        Ok(())
    }
}

pub fn dune() -> Book {
    Book {
        id: "1".into(),
        title: "Dune".into(),
        author: "Herbert".into(),
    }
}
