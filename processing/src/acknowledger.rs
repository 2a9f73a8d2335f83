use crate::{
    error::RemoteServiceError,
    model::{ExecutionStatus, MerchantOrder},
    operation_id::OperationIdGenerator,
    service::OrdersService,
};
use std::sync::Arc;
use tracing::info;

/// Marks orders as received so the listing stops returning them.
pub struct Acknowledger<O: MerchantOrder> {
    service: Arc<dyn OrdersService<O>>,
    operation_ids: Arc<dyn OperationIdGenerator>,
}

impl<O: MerchantOrder> Acknowledger<O> {
    pub fn new(
        service: Arc<dyn OrdersService<O>>,
        operation_ids: Arc<dyn OperationIdGenerator>,
    ) -> Self {
        Self {
            service,
            operation_ids,
        }
    }

    /// Every call draws a fresh operation id, so a second call for the same
    /// order is a new request rather than a replay.
    pub async fn acknowledge(
        &self,
        merchant_id: u64,
        order_id: &str,
    ) -> Result<ExecutionStatus, RemoteServiceError> {
        let operation_id = self.operation_ids.next_id();
        info!(merchant_id, order_id, %operation_id, "Acknowledging order");

        let status = self
            .service
            .acknowledge(merchant_id, order_id, &operation_id)
            .await?;

        info!(order_id, %status, "Acknowledge finished");
        Ok(status)
    }
}
