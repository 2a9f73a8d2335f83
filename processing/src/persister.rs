use crate::{error::PersistenceError, model::MerchantOrder};
use async_trait::async_trait;

/// Stores one line item of an order, together with the order-level fields.
#[async_trait]
pub trait OrderPersister<O: MerchantOrder>: Send + Sync {
    async fn persist(&self, order: &O, line_item: &O::Line) -> Result<(), PersistenceError>;
}
