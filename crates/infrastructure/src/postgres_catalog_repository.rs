use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use shopgate_application::CatalogRepository;
use shopgate_core::{AppError, AppResult, PermissionId, ResourceId};
use shopgate_domain::{Action, PermissionDefinition, ResourceDefinition};

use crate::postgres_rows::{PermissionRow, ResourceRow, is_unique_violation};

/// PostgreSQL-backed repository for the permission and resource catalog.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, action, display_name, description
            FROM rbac_permissions
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        let mut permissions = rows
            .into_iter()
            .map(PermissionRow::into_permission)
            .collect::<AppResult<Vec<_>>>()?;
        permissions.sort_by_key(PermissionDefinition::action);
        Ok(permissions)
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, action, display_name, description
            FROM rbac_permissions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    async fn find_permission_by_action(
        &self,
        action: Action,
    ) -> AppResult<Option<PermissionDefinition>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, action, display_name, description
            FROM rbac_permissions
            WHERE action = $1
            "#,
        )
        .bind(action.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission '{action}': {error}"))
        })?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    async fn ensure_permission(
        &self,
        permission: PermissionDefinition,
    ) -> AppResult<PermissionDefinition> {
        sqlx::query(
            r#"
            INSERT INTO rbac_permissions (id, action, display_name, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (action) DO NOTHING
            "#,
        )
        .bind(permission.id().as_uuid())
        .bind(permission.action().as_str())
        .bind(permission.display_name().as_str())
        .bind(permission.description())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to seed permission: {error}")))?;

        self.find_permission_by_action(permission.action())
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "permission '{}' vanished after seeding",
                    permission.action()
                ))
            })
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_permissions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete permission: {error}")))?;

        debug!(permission_id = %id, deleted = result.rows_affected(), "deleted permission");
        Ok(result.rows_affected() > 0)
    }

    async fn list_resources(&self) -> AppResult<Vec<ResourceDefinition>> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, name, display_name, description, is_active
            FROM rbac_resources
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list resources: {error}")))?;

        rows.into_iter().map(ResourceRow::into_resource).collect()
    }

    async fn find_resource(&self, id: ResourceId) -> AppResult<Option<ResourceDefinition>> {
        sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, name, display_name, description, is_active
            FROM rbac_resources
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find resource: {error}")))?
        .map(ResourceRow::into_resource)
        .transpose()
    }

    async fn find_resource_by_name(&self, name: &str) -> AppResult<Option<ResourceDefinition>> {
        sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT id, name, display_name, description, is_active
            FROM rbac_resources
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find resource '{name}': {error}"))
        })?
        .map(ResourceRow::into_resource)
        .transpose()
    }

    async fn create_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_resources (id, name, display_name, description, is_active)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(resource.id().as_uuid())
        .bind(resource.name().as_str())
        .bind(resource.display_name().as_str())
        .bind(resource.description())
        .bind(resource.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Validation(format!(
                    "resource '{}' already exists",
                    resource.name()
                ));
            }

            AppError::Internal(format!("failed to create resource: {error}"))
        })?;

        Ok(())
    }

    async fn update_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rbac_resources
            SET display_name = $2,
                description = $3,
                is_active = $4,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(resource.id().as_uuid())
        .bind(resource.display_name().as_str())
        .bind(resource.description())
        .bind(resource.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update resource: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "resource '{}' does not exist",
                resource.id()
            )));
        }

        Ok(())
    }

    async fn delete_resource(&self, id: ResourceId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_resources
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete resource: {error}")))?;

        debug!(resource_id = %id, deleted = result.rows_affected(), "deleted resource");
        Ok(result.rows_affected() > 0)
    }
}
