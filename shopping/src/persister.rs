use crate::{
    model::{LineItem, Order},
    procedure::StoredProcedureCall,
};
use async_trait::async_trait;
use common::config::{PersisterConfig, is_valid_procedure_name};
use processing::{error::PersistenceError, persister::OrderPersister};
use sqlx::{
    Connection, PgConnection,
    postgres::PgConnectOptions,
};
use std::{str::FromStr, time::Duration};
use tracing::{debug, warn};

const QUERY_CANCELED: &str = "57014";
const CLIENT_GRACE: Duration = Duration::from_secs(5);

/// Calls the order dump procedure once per line item.
///
/// Each call opens its own connection and closes it again whatever the outcome,
/// so a slow or broken call never leaves a session behind for the next one.
/// Connecting and executing are each bounded by the configured timeout.
pub struct StoredProcedurePersister {
    database_url: String,
    procedure: String,
    timeout: Duration,
}

impl StoredProcedurePersister {
    pub fn new(
        database_url: impl Into<String>,
        procedure: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PersistenceError> {
        let procedure = procedure.into();
        if !is_valid_procedure_name(&procedure) {
            return Err(PersistenceError::InvalidProcedureName(procedure));
        }

        Ok(Self {
            database_url: database_url.into(),
            procedure,
            timeout,
        })
    }

    pub fn from_config(database_url: &str, config: &PersisterConfig) -> Result<Self, PersistenceError> {
        Self::new(
            database_url,
            config.procedure.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Connection options carrying the call timeout as the session's
    /// `statement_timeout`, so the server cancels the procedure (and rolls its
    /// insert back) instead of finishing it after the client gave up.
    pub fn connect_options(&self) -> Result<PgConnectOptions, PersistenceError> {
        let options =
            PgConnectOptions::from_str(&self.database_url).map_err(PersistenceError::Connect)?;
        Ok(options.options([(
            "statement_timeout",
            format!("{}ms", self.timeout.as_millis()),
        )]))
    }

    pub async fn execute(&self, call: &StoredProcedureCall) -> Result<(), PersistenceError> {
        let sql = call.sql(&self.procedure);
        let options = self.connect_options()?;

        let connecting = PgConnection::connect_with(&options);
        let mut conn = match tokio::time::timeout(self.timeout, connecting).await {
            Err(_) => return Err(PersistenceError::Timeout(self.timeout)),
            Ok(conn) => conn.map_err(PersistenceError::Connect)?,
        };

        let mut query = sqlx::query(&sql);
        for (_, value) in call.params() {
            query = query.bind(value.as_deref());
        }

        // The server-side timeout normally fires first; this only guards a stalled socket.
        let guard = self.timeout + CLIENT_GRACE;
        let outcome = tokio::time::timeout(guard, query.execute(&mut conn)).await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection");
        }

        match outcome {
            Err(_) => Err(PersistenceError::Timeout(self.timeout)),
            Ok(Err(e)) if is_statement_timeout(&e) => Err(PersistenceError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(PersistenceError::Execute(e)),
            Ok(Ok(_)) => Ok(()),
        }
    }
}

/// `query_canceled`, raised when `statement_timeout` expires.
fn is_statement_timeout(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == QUERY_CANCELED)
}

#[async_trait]
impl OrderPersister<Order> for StoredProcedurePersister {
    async fn persist(&self, order: &Order, line_item: &LineItem) -> Result<(), PersistenceError> {
        let call = StoredProcedureCall::for_line_item(order, line_item)?;
        debug!(
            procedure = %self.procedure,
            order_id = ?order.id,
            line_item_id = ?line_item.id,
            "Calling stored procedure"
        );
        self.execute(&call).await
    }
}
