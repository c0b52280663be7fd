use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use shopgate_application::{GrantMatrixRepository, RoleRepository};
use shopgate_core::{AppError, AppResult, RoleId};
use shopgate_domain::{PermissionString, Role, RoleGrant};

use crate::postgres_rows::{
    GrantRow, RoleRow, into_roles, is_foreign_key_violation, is_unique_violation,
};

/// PostgreSQL-backed repository for roles and the Grant Matrix.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, is_super_admin, is_active, created_by
            FROM rbac_roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        into_roles(rows)
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, is_super_admin, is_active, created_by
            FROM rbac_roles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, is_super_admin, is_active, created_by
            FROM rbac_roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{name}': {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_roles (
                id,
                name,
                display_name,
                description,
                is_system,
                is_super_admin,
                is_active,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.name().as_str())
        .bind(role.display_name().as_str())
        .bind(role.description())
        .bind(role.is_system())
        .bind(role.is_super_admin())
        .bind(role.is_active())
        .bind(role.created_by().map(|user_id| user_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Validation(format!("role '{}' already exists", role.name()));
            }

            AppError::Internal(format!("failed to create role: {error}"))
        })?;

        Ok(())
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rbac_roles
            SET display_name = $2,
                description = $3,
                is_active = $4,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role.id().as_uuid())
        .bind(role.display_name().as_str())
        .bind(role.description())
        .bind(role.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id()
            )));
        }

        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_roles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        debug!(role_id = %id, deleted = result.rows_affected(), "deleted role");
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GrantMatrixRepository for PostgresRoleRepository {
    async fn insert_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO rbac_role_grants (role_id, resource_id, permission_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, resource_id, permission_id) DO NOTHING
            "#,
        )
        .bind(grant.role_id.as_uuid())
        .bind(grant.resource_id.as_uuid())
        .bind(grant.permission_id.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(error) if is_unique_violation(&error) => Ok(false),
            Err(error) if is_foreign_key_violation(&error) => Err(AppError::NotFound(format!(
                "grant references a missing role, resource or permission: {error}"
            ))),
            Err(error) => Err(AppError::Internal(format!(
                "failed to insert grant: {error}"
            ))),
        }
    }

    async fn delete_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_role_grants
            WHERE role_id = $1
                AND resource_id = $2
                AND permission_id = $3
            "#,
        )
        .bind(grant.role_id.as_uuid())
        .bind(grant.resource_id.as_uuid())
        .bind(grant.permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete grant: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_role_grants(&self, role_id: RoleId) -> AppResult<Vec<PermissionString>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                grants.role_id,
                resources.name AS resource_name,
                permissions.action
            FROM rbac_role_grants AS grants
            INNER JOIN rbac_resources AS resources
                ON resources.id = grants.resource_id
            INNER JOIN rbac_permissions AS permissions
                ON permissions.id = grants.permission_id
            WHERE grants.role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role grants: {error}")))?;

        let mut grants = rows
            .iter()
            .map(GrantRow::permission_string)
            .collect::<AppResult<Vec<_>>>()?;
        grants.sort();
        Ok(grants)
    }
}

#[cfg(test)]
mod tests;
