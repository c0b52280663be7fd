use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use shopgate_core::{AppError, AppResult, PermissionId, ResourceId, RoleId, TeamId, UserId};
use shopgate_domain::{
    Action, IdentifierName, PermissionDefinition, PermissionString, ResourceDefinition, Role,
    RoleFlags, Team, TeamMembership,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    has_database_code(error, UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    has_database_code(error, FOREIGN_KEY_VIOLATION)
}

fn has_database_code(error: &sqlx::Error, code: &str) -> bool {
    if let sqlx::Error::Database(database_error) = error
        && database_error.code().as_deref() == Some(code)
    {
        return true;
    }

    false
}

fn decode_error(kind: &str, id: Uuid, error: AppError) -> AppError {
    AppError::Internal(format!("failed to decode {kind} '{id}': {error}"))
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    id: Uuid,
    action: String,
    display_name: String,
    description: Option<String>,
}

impl PermissionRow {
    pub(crate) fn into_permission(self) -> AppResult<PermissionDefinition> {
        let id = self.id;
        Action::from_str(self.action.as_str())
            .and_then(|action| {
                PermissionDefinition::new(
                    PermissionId::from_uuid(id),
                    action,
                    self.display_name,
                    self.description,
                )
            })
            .map_err(|error| decode_error("permission", id, error))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ResourceRow {
    id: Uuid,
    name: String,
    display_name: String,
    description: Option<String>,
    is_active: bool,
}

impl ResourceRow {
    pub(crate) fn into_resource(self) -> AppResult<ResourceDefinition> {
        let id = self.id;
        ResourceDefinition::new(
            ResourceId::from_uuid(id),
            self.name,
            self.display_name,
            self.description,
            self.is_active,
        )
        .map_err(|error| decode_error("resource", id, error))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    id: Uuid,
    name: String,
    display_name: String,
    description: Option<String>,
    is_system: bool,
    is_super_admin: bool,
    is_active: bool,
    created_by: Option<Uuid>,
}

impl RoleRow {
    pub(crate) fn into_role(self) -> AppResult<Role> {
        let id = self.id;
        Role::new(
            RoleId::from_uuid(id),
            self.name,
            self.display_name,
            self.description,
            RoleFlags {
                is_system: self.is_system,
                is_super_admin: self.is_super_admin,
                is_active: self.is_active,
            },
            self.created_by.map(UserId::from_uuid),
        )
        .map_err(|error| decode_error("role", id, error))
    }
}

pub(crate) fn into_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    rows.into_iter().map(RoleRow::into_role).collect()
}

#[derive(Debug, FromRow)]
pub(crate) struct TeamRow {
    id: Uuid,
    name: String,
    display_name: String,
    description: Option<String>,
    is_active: bool,
    created_by: Option<Uuid>,
}

impl TeamRow {
    pub(crate) fn into_team(self) -> AppResult<Team> {
        let id = self.id;
        Team::new(
            TeamId::from_uuid(id),
            self.name,
            self.display_name,
            self.description,
            self.is_active,
            self.created_by.map(UserId::from_uuid),
        )
        .map_err(|error| decode_error("team", id, error))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct MembershipRow {
    team_id: Uuid,
    user_id: Uuid,
    joined_at: DateTime<Utc>,
}

impl From<MembershipRow> for TeamMembership {
    fn from(row: MembershipRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            team_id: TeamId::from_uuid(row.team_id),
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct GrantRow {
    pub(crate) role_id: Uuid,
    resource_name: String,
    action: String,
}

impl GrantRow {
    pub(crate) fn permission_string(&self) -> AppResult<PermissionString> {
        IdentifierName::new(self.resource_name.as_str())
            .and_then(|resource| {
                Action::from_str(self.action.as_str())
                    .map(|action| PermissionString::new(resource, action))
            })
            .map_err(|error| decode_error("grant of role", self.role_id, error))
    }
}
