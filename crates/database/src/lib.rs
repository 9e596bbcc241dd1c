//! # Bookstore Database Crate
//!
//! This crate is the database gateway of the service. It owns the connection
//! lifecycle of every statement and hides the SQL from the web layer.
//!
//! ## Architectural Principles
//!
//! - **Staged Execution:** Each call opens a connection, selects the configured
//!   schema, runs one statement, and closes the connection. See [`gateway`].
//! - **No Pooling:** Connections are never reused across calls. Calls are
//!   serialized by the gateway so they cannot interleave.
//! - **Parameterized SQL:** User values are bound, never spliced into text.
//!
//! ## Public API
//!
//! - `Gateway`: configured once from the `hana` binding, executes statements.
//! - `ConnectionProvider` / `Session`: the seam between the gateway and the driver.
//! - `DbRepository`: the books operations used by the web layer.
//! - `run_migrations`: creates the books relation inside the configured schema.
//! - `DbError`, `GatewayError`: the error types returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod gateway;
pub mod repository;
pub mod statement;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{run_migrations, ConnectionProvider, PgConnectionProvider, QueryOutcome, Session};
pub use error::{DbError, GatewayError};
pub use gateway::Gateway;
pub use repository::DbRepository;
pub use statement::Statement;
