//! Audit sink interface and local implementations.
//!
//! Audit writes are fire-and-forget from the evaluator's perspective: a
//! failing sink is logged and the protected operation proceeds. Availability
//! of the operation takes priority over audit completeness.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::AuditRecord;

use super::error::AuthzError;

/// Append-only audit record consumer. At-least-once delivery is acceptable;
/// implementations must tolerate duplicates.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    async fn record(&self, record: AuditRecord) -> Result<(), AuthzError>;
}

/// Write the record, or log a warning and move on.
pub(crate) async fn record_or_warn(sink: &Arc<dyn AuditSink>, record: AuditRecord) {
    let event_code = record.event_code.clone();
    if let Err(e) = sink.record(record).await {
        tracing::warn!(
            error = %e,
            event_code = %event_code,
            "audit sink unavailable, proceeding without audit record"
        );
    }
}

/// Audit sink that emits structured log lines. Never fails.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuthzError> {
        tracing::info!(
            actor_id = %record.actor_id,
            effective_principal_id = ?record.effective_principal_id,
            event_code = %record.event_code,
            action_code = %record.action_code,
            resource_type = %record.resource_type,
            resource_id = ?record.resource_id,
            details = %record.details,
            "audit event"
        );
        Ok(())
    }
}

/// Audit sink that buffers records in memory for inspection.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Count of records with the given event code.
    pub async fn count_events(&self, event_code: &str) -> usize {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.event_code == event_code)
            .count()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuthzError> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

/// Audit sink that always fails. Exercises the never-block-the-operation
/// recovery path in tests.
#[derive(Debug, Clone, Default)]
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn record(&self, _record: AuditRecord) -> Result<(), AuthzError> {
        Err(AuthzError::AuditUnavailable("sink offline".to_string()))
    }
}
