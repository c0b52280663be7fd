use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use shopgate_application::{AuthorizationRepository, PrincipalSnapshot, ResolvedRoleGrant};
use shopgate_core::{AppError, AppResult, RoleId, UserId};

use crate::postgres_rows::{GrantRow, RoleRow, into_roles};

/// PostgreSQL-backed repository for principal aggregation reads.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn load_principal_snapshot(
        &self,
        user_id: UserId,
        direct_role_name: &str,
    ) -> AppResult<PrincipalSnapshot> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to configure snapshot transaction: {error}"))
            })?;

        let direct_role = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, display_name, description, is_system, is_super_admin, is_active, created_by
            FROM rbac_roles
            WHERE name = $1
            "#,
        )
        .bind(direct_role_name)
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve direct role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()?;

        let team_roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT DISTINCT
                roles.id,
                roles.name,
                roles.display_name,
                roles.description,
                roles.is_system,
                roles.is_super_admin,
                roles.is_active,
                roles.created_by
            FROM rbac_team_members AS members
            INNER JOIN rbac_team_roles AS team_roles
                ON team_roles.team_id = members.team_id
            INNER JOIN rbac_roles AS roles
                ON roles.id = team_roles.role_id
            WHERE members.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load team roles: {error}")))?;
        let team_roles = into_roles(team_roles)?;

        let member_roles = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT DISTINCT
                roles.id,
                roles.name,
                roles.display_name,
                roles.description,
                roles.is_system,
                roles.is_super_admin,
                roles.is_active,
                roles.created_by
            FROM rbac_member_roles AS member_roles
            INNER JOIN rbac_roles AS roles
                ON roles.id = member_roles.role_id
            WHERE member_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load member roles: {error}")))?;
        let member_roles = into_roles(member_roles)?;

        let role_ids: Vec<Uuid> = direct_role
            .iter()
            .chain(team_roles.iter())
            .chain(member_roles.iter())
            .map(|role| role.id().as_uuid())
            .collect();

        let grant_rows = sqlx::query_as::<_, GrantRow>(
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
            WHERE grants.role_id = ANY($1)
            "#,
        )
        .bind(role_ids)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        let grants = grant_rows
            .iter()
            .map(|row| {
                row.permission_string().map(|permission| ResolvedRoleGrant {
                    role_id: RoleId::from_uuid(row.role_id),
                    permission,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        debug!(
            user_id = %user_id,
            team_roles = team_roles.len(),
            member_roles = member_roles.len(),
            grants = grants.len(),
            "loaded principal snapshot"
        );

        Ok(PrincipalSnapshot {
            direct_role,
            team_roles,
            member_roles,
            grants,
        })
    }
}

#[cfg(test)]
mod tests;
