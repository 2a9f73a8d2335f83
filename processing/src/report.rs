use crate::{
    error::{SyncError, SyncErrorKind},
    model::ExecutionStatus,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct LineItemFailure {
    pub order_id: Option<String>,
    pub line_item_id: Option<String>,
    pub kind: SyncErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderFailure {
    pub order_id: Option<String>,
    pub kind: SyncErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgment {
    pub order_id: String,
    pub status: ExecutionStatus,
}

/// Outcome of one pass over the unacknowledged orders.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub merchant_id: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pages: usize,
    /// Ids of the orders visited, in listing order.
    pub orders: Vec<Option<String>>,
    pub line_items_persisted: usize,
    pub persistence_failures: Vec<LineItemFailure>,
    pub acknowledged: Vec<Acknowledgment>,
    pub acknowledge_failures: Vec<OrderFailure>,
    pub listing_error: Option<OrderFailure>,
}

impl SyncReport {
    pub fn start(merchant_id: u64) -> Self {
        Self {
            merchant_id,
            started_at: Utc::now(),
            finished_at: None,
            pages: 0,
            orders: Vec::new(),
            line_items_persisted: 0,
            persistence_failures: Vec::new(),
            acknowledged: Vec::new(),
            acknowledge_failures: Vec::new(),
            listing_error: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record_persistence_failure(
        &mut self,
        order_id: Option<&str>,
        line_item_id: Option<&str>,
        error: &SyncError,
    ) {
        self.persistence_failures.push(LineItemFailure {
            order_id: order_id.map(str::to_string),
            line_item_id: line_item_id.map(str::to_string),
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn record_acknowledge_failure(&mut self, order_id: Option<&str>, error: &SyncError) {
        self.acknowledge_failures.push(OrderFailure {
            order_id: order_id.map(str::to_string),
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn record_listing_failure(&mut self, error: &SyncError) {
        self.listing_error = Some(OrderFailure {
            order_id: None,
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    pub fn acknowledged_order_ids(&self) -> Vec<&str> {
        self.acknowledged.iter().map(|a| a.order_id.as_str()).collect()
    }

    /// No step failed anywhere in the run.
    pub fn is_clean(&self) -> bool {
        self.persistence_failures.is_empty()
            && self.acknowledge_failures.is_empty()
            && self.listing_error.is_none()
    }

    pub fn elapsed_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}
