use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use shopgate_application::TeamRepository;
use shopgate_core::{AppError, AppResult, RoleId, TeamId, UserId};
use shopgate_domain::{Role, Team, TeamMembership, TeamRoleBinding};

use crate::postgres_rows::{
    MembershipRow, RoleRow, TeamRow, into_roles, is_foreign_key_violation, is_unique_violation,
};

/// PostgreSQL-backed repository for teams, memberships and team-scoped roles.
#[derive(Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_association_error(error: sqlx::Error, association: &str) -> AppResult<bool> {
    if is_unique_violation(&error) {
        return Ok(false);
    }
    if is_foreign_key_violation(&error) {
        return Err(AppError::NotFound(format!(
            "{association} references a missing record: {error}"
        )));
    }

    Err(AppError::Internal(format!(
        "failed to insert {association}: {error}"
    )))
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, display_name, description, is_active, created_by
            FROM rbac_teams
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list teams: {error}")))?;

        rows.into_iter().map(TeamRow::into_team).collect()
    }

    async fn find_team(&self, id: TeamId) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, display_name, description, is_active, created_by
            FROM rbac_teams
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find team: {error}")))?
        .map(TeamRow::into_team)
        .transpose()
    }

    async fn create_team(&self, team: Team) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_teams (id, name, display_name, description, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name().as_str())
        .bind(team.display_name().as_str())
        .bind(team.description())
        .bind(team.is_active())
        .bind(team.created_by().map(|user_id| user_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Validation(format!("team '{}' already exists", team.name()));
            }

            AppError::Internal(format!("failed to create team: {error}"))
        })?;

        Ok(())
    }

    async fn update_team(&self, team: Team) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE rbac_teams
            SET display_name = $2,
                description = $3,
                is_active = $4,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.display_name().as_str())
        .bind(team.description())
        .bind(team.is_active())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update team: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "team '{}' does not exist",
                team.id()
            )));
        }

        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_teams
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete team: {error}")))?;

        debug!(team_id = %id, deleted = result.rows_affected(), "deleted team");
        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO rbac_team_members (team_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(error) => map_association_error(error, "team membership"),
        }
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_team_members
            WHERE team_id = $1
                AND user_id = $2
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove team member: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM rbac_team_members
                WHERE team_id = $1
                    AND user_id = $2
            )
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve membership: {error}")))
    }

    async fn list_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMembership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT team_id, user_id, joined_at
            FROM rbac_team_members
            WHERE team_id = $1
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list team members: {error}")))?;

        Ok(rows.into_iter().map(TeamMembership::from).collect())
    }

    async fn insert_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO rbac_team_roles (team_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (team_id, role_id) DO NOTHING
            "#,
        )
        .bind(binding.team_id.as_uuid())
        .bind(binding.role_id.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(error) => map_association_error(error, "team role"),
        }
    }

    async fn delete_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_team_roles
            WHERE team_id = $1
                AND role_id = $2
            "#,
        )
        .bind(binding.team_id.as_uuid())
        .bind(binding.role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete team role: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_team_roles(&self, team_id: TeamId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id,
                roles.name,
                roles.display_name,
                roles.description,
                roles.is_system,
                roles.is_super_admin,
                roles.is_active,
                roles.created_by
            FROM rbac_team_roles AS team_roles
            INNER JOIN rbac_roles AS roles
                ON roles.id = team_roles.role_id
            WHERE team_roles.team_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list team roles: {error}")))?;

        into_roles(rows)
    }

    async fn insert_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO rbac_member_roles (team_id, user_id, role_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id, role_id) DO NOTHING
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(error) => map_association_error(error, "member role"),
        }
    }

    async fn delete_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM rbac_member_roles
            WHERE team_id = $1
                AND user_id = $2
                AND role_id = $3
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete member role: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_member_roles(&self, team_id: TeamId, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
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
            WHERE member_roles.team_id = $1
                AND member_roles.user_id = $2
            ORDER BY roles.name
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list member roles: {error}")))?;

        into_roles(rows)
    }
}
