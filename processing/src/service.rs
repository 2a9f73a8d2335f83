use crate::{
    error::RemoteServiceError,
    model::{ExecutionStatus, ListOrdersQuery, MerchantOrder, OperationId, OrdersPage},
};
use async_trait::async_trait;

/// The slice of the remote orders API the sync loop depends on.
#[async_trait]
pub trait OrdersService<O: MerchantOrder>: Send + Sync {
    async fn list_orders(
        &self,
        query: &ListOrdersQuery,
    ) -> Result<OrdersPage<O>, RemoteServiceError>;

    async fn acknowledge(
        &self,
        merchant_id: u64,
        order_id: &str,
        operation_id: &OperationId,
    ) -> Result<ExecutionStatus, RemoteServiceError>;
}
