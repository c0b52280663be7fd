use async_trait::async_trait;
use shopgate_core::{AppResult, UserId};
use shopgate_domain::AuditAction;

/// Immutable audit event payload emitted by administration services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// User that performed the action.
    pub actor: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Record type label.
    pub resource_type: String,
    /// Record identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
