//! Staged execution of statements against the store.
//!
//! Every call runs connect, select-schema, execute and disconnect in that
//! order. A failure only ends its own stage: a connection that was opened is
//! always closed. The recorded outcomes are then combined into one result by
//! the configured [`StagePolicy`].
//!
//! If connect fails there is no session, so no later stage runs and the
//! connect error is the result under either policy.

use crate::connection::{ConnectionProvider, PgConnectionProvider, QueryOutcome};
use crate::error::{DbError, GatewayError};
use crate::statement::Statement;
use configuration::HanaBinding;
use core_types::{Stage, StagePolicy};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the connection lifecycle for every statement the service runs.
///
/// Calls are serialized: only one staged sequence is in flight at a time.
pub struct Gateway {
    provider: Arc<dyn ConnectionProvider>,
    schema: String,
    policy: StagePolicy,
    lock: Mutex<()>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("schema", &self.schema)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// What each stage of one call recorded.
#[derive(Debug)]
pub struct StageReport {
    pub opened: Result<(), GatewayError>,
    /// `None` when no connection was available to run on.
    pub executed: Option<Result<QueryOutcome, GatewayError>>,
    /// `None` when no connection was opened.
    pub closed: Option<Result<(), GatewayError>>,
}

impl Gateway {
    pub fn new(
        provider: Arc<dyn ConnectionProvider>,
        schema: impl Into<String>,
        policy: StagePolicy,
    ) -> Self {
        Self {
            provider,
            schema: schema.into(),
            policy,
            lock: Mutex::new(()),
        }
    }

    /// Builds a PostgreSQL-backed gateway from the resolved binding.
    ///
    /// Only the connect options are prepared; no connection is opened until
    /// the first [`Gateway::execute`].
    pub fn configure(binding: &HanaBinding, policy: StagePolicy) -> Self {
        tracing::info!(
            host = %binding.host,
            port = binding.port,
            schema = %binding.schema,
            ?policy,
            "Configured database gateway."
        );
        Self::new(
            Arc::new(PgConnectionProvider::new(binding)),
            binding.schema.clone(),
            policy,
        )
    }

    /// Runs `statement` through the full connect/schema/execute/disconnect sequence.
    pub async fn execute(&self, statement: &Statement) -> Result<QueryOutcome, GatewayError> {
        let report = {
            let _guard = self.lock.lock().await;
            self.run_stages(statement).await
        };
        resolve(self.policy, report)
    }

    async fn run_stages(&self, statement: &Statement) -> StageReport {
        tracing::debug!(sql = statement.sql(), params = statement.params().len(), "Executing statement.");

        let mut session = match self.provider.open().await {
            Ok(session) => session,
            Err(e) => {
                let err = GatewayError::new(Stage::Connect, e);
                tracing::error!(error = %err, "Failed to open database connection.");
                return StageReport {
                    opened: Err(err),
                    executed: None,
                    closed: None,
                };
            }
        };

        let executed = match session.set_schema(&self.schema).await {
            Err(e) => Err(GatewayError::new(Stage::SetSchema, e)),
            Ok(()) => session
                .run(statement)
                .await
                .map_err(|e| GatewayError::new(Stage::Execute, e)),
        };
        if let Err(err) = &executed {
            tracing::error!(error = %err, sql = statement.sql(), "Statement failed.");
        }

        let closed = session
            .close()
            .await
            .map_err(|e| GatewayError::new(Stage::Disconnect, e));
        if let Err(err) = &closed {
            tracing::error!(error = %err, "Failed to close database connection.");
        }

        StageReport {
            opened: Ok(()),
            executed: Some(executed),
            closed: Some(closed),
        }
    }
}

/// Combines stage outcomes into the single result of a gateway call.
pub fn resolve(policy: StagePolicy, report: StageReport) -> Result<QueryOutcome, GatewayError> {
    let StageReport {
        opened,
        executed,
        closed,
    } = report;

    opened?;
    let executed = executed.unwrap_or_else(|| {
        Err(GatewayError::new(
            Stage::Execute,
            DbError::UnexpectedOutcome("a statement result"),
        ))
    });

    match (policy, closed) {
        (StagePolicy::Overwrite, Some(Err(close_err))) => Err(close_err),
        (StagePolicy::ShortCircuit, Some(Err(close_err))) => {
            if executed.is_ok() {
                tracing::warn!(error = %close_err, "Keeping statement result despite disconnect failure.");
            }
            executed
        }
        _ => executed,
    }
}
