use serde::{Deserialize, Serialize};
use std::fmt;

/// Read-only view of an order as fetched from the remote service.
///
/// The sync loop only needs identities and the line-item sequence; everything
/// else is the business of the printer and persister implementations.
pub trait MerchantOrder: Send + Sync + 'static {
    type Line: OrderLine;

    fn order_id(&self) -> Option<&str>;

    fn line_items(&self) -> &[Self::Line];
}

pub trait OrderLine: Send + Sync + 'static {
    fn line_item_id(&self) -> Option<&str>;
}

/// Client-supplied token the remote service uses to reject replayed mutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result code of a mutation. Unknown codes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Executed,
    Duplicate,
    Other(String),
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "executed" => ExecutionStatus::Executed,
            "duplicate" => ExecutionStatus::Duplicate,
            _ => ExecutionStatus::Other(value),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Executed => f.write_str("executed"),
            ExecutionStatus::Duplicate => f.write_str("duplicate"),
            ExecutionStatus::Other(other) => f.write_str(other),
        }
    }
}

/// Filter sent with every listing call made by the lister.
pub const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrdersQuery {
    pub merchant_id: u64,
    pub acknowledged: Option<bool>,
    pub statuses: Vec<String>,
    pub page_token: Option<String>,
    pub max_results: Option<u32>,
}

impl ListOrdersQuery {
    /// Unacknowledged, non-terminal orders.
    pub fn unacknowledged(
        merchant_id: u64,
        page_token: Option<String>,
        max_results: Option<u32>,
    ) -> Self {
        Self {
            merchant_id,
            acknowledged: Some(false),
            statuses: vec![ACTIVE_STATUS.to_string()],
            page_token,
            max_results,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrdersPage<O> {
    pub orders: Vec<O>,
    pub next_page_token: Option<String>,
}

impl<O> OrdersPage<O> {
    /// The continuation token, treating an empty string as absent.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|token| !token.is_empty())
    }
}
