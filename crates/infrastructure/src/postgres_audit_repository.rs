use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use shopgate_application::{AuditEvent, AuditRepository};
use shopgate_core::{AppError, AppResult};

/// Append-only audit trail of administration mutations.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let action = event.action.as_str();
        let entry_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO audit_log_entries (actor, action, resource_type, resource_id, detail)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(event.actor.as_uuid())
        .bind(action)
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.as_str())
        .bind(event.detail.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to record audit event '{action}': {error}"))
        })?;

        debug!(
            %entry_id,
            actor = %event.actor,
            action,
            resource_id = %event.resource_id,
            "recorded audit event"
        );
        Ok(())
    }
}
