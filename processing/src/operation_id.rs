use crate::model::OperationId;
use common::config::OperationIdKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of operation ids for mutating calls.
///
/// Injected as `Arc<dyn OperationIdGenerator>` into whatever issues mutations,
/// so a run has exactly one generator and tests can supply their own.
pub trait OperationIdGenerator: Send + Sync {
    fn next_id(&self) -> OperationId;
}

/// Monotonic counter scoped to one process run.
///
/// Restarting the process starts again from the same value, so ids can repeat
/// against orders touched by an earlier run.
#[derive(Debug, Default)]
pub struct SequentialOperationIds {
    nonce: AtomicU64,
}

impl SequentialOperationIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            nonce: AtomicU64::new(start),
        }
    }
}

impl OperationIdGenerator for SequentialOperationIds {
    fn next_id(&self) -> OperationId {
        let value = self.nonce.fetch_add(1, Ordering::Relaxed);
        OperationId::new(value.to_string())
    }
}

/// Random v4 UUIDs; safe across restarts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomOperationIds;

impl OperationIdGenerator for RandomOperationIds {
    fn next_id(&self) -> OperationId {
        OperationId::new(Uuid::new_v4().to_string())
    }
}

pub fn generator_for(kind: OperationIdKind) -> Arc<dyn OperationIdGenerator> {
    match kind {
        OperationIdKind::Sequential => Arc::new(SequentialOperationIds::new()),
        OperationIdKind::Random => Arc::new(RandomOperationIds),
    }
}
