use async_trait::async_trait;

use shopgate_core::{AppResult, PermissionId, ResourceId, RoleId, TeamId, UserId};
use shopgate_domain::{
    Action, PermissionDefinition, PermissionString, ResourceDefinition, Role, RoleGrant, Team,
    TeamMembership, TeamRoleBinding,
};

/// Repository port for the permission and resource catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Lists all permission verbs ordered by action.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>>;

    /// Finds a permission by identifier.
    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>>;

    /// Finds the permission carrying an action.
    async fn find_permission_by_action(
        &self,
        action: Action,
    ) -> AppResult<Option<PermissionDefinition>>;

    /// Stores a permission unless one with the same action exists, returning the stored row.
    async fn ensure_permission(
        &self,
        permission: PermissionDefinition,
    ) -> AppResult<PermissionDefinition>;

    /// Deletes a permission and every grant referencing it.
    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool>;

    /// Lists all resources ordered by name.
    async fn list_resources(&self) -> AppResult<Vec<ResourceDefinition>>;

    /// Finds a resource by identifier.
    async fn find_resource(&self, id: ResourceId) -> AppResult<Option<ResourceDefinition>>;

    /// Finds a resource by its unique name.
    async fn find_resource_by_name(&self, name: &str) -> AppResult<Option<ResourceDefinition>>;

    /// Creates a resource; a duplicate name is a validation error.
    async fn create_resource(&self, resource: ResourceDefinition) -> AppResult<()>;

    /// Persists mutable resource attributes.
    async fn update_resource(&self, resource: ResourceDefinition) -> AppResult<()>;

    /// Deletes a resource and every grant referencing it.
    async fn delete_resource(&self, id: ResourceId) -> AppResult<bool>;
}

/// Repository port for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by identifier.
    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Creates a role; a duplicate name is a validation error.
    async fn create_role(&self, role: Role) -> AppResult<()>;

    /// Persists mutable role attributes.
    async fn update_role(&self, role: Role) -> AppResult<()>;

    /// Deletes a role together with its grants and team associations.
    async fn delete_role(&self, id: RoleId) -> AppResult<bool>;
}

/// Repository port for the Grant Matrix.
#[async_trait]
pub trait GrantMatrixRepository: Send + Sync {
    /// Inserts a grant row. Returns `false` when the triple already existed.
    async fn insert_grant(&self, grant: RoleGrant) -> AppResult<bool>;

    /// Deletes a grant row. Returns `false` when the triple did not exist.
    async fn delete_grant(&self, grant: RoleGrant) -> AppResult<bool>;

    /// Lists the resolved grants of one role.
    async fn list_role_grants(&self, role_id: RoleId) -> AppResult<Vec<PermissionString>>;
}

/// Repository port for teams and their role associations.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Lists all teams ordered by name.
    async fn list_teams(&self) -> AppResult<Vec<Team>>;

    /// Finds a team by identifier.
    async fn find_team(&self, id: TeamId) -> AppResult<Option<Team>>;

    /// Creates a team; a duplicate name is a validation error.
    async fn create_team(&self, team: Team) -> AppResult<()>;

    /// Persists mutable team attributes.
    async fn update_team(&self, team: Team) -> AppResult<()>;

    /// Deletes a team with its memberships and role associations.
    async fn delete_team(&self, id: TeamId) -> AppResult<bool>;

    /// Adds a user to a team. Returns `false` when already a member.
    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool>;

    /// Removes a user and their per-member roles from a team.
    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool>;

    /// Returns whether the user belongs to the team.
    async fn is_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool>;

    /// Lists memberships of a team ordered by join time.
    async fn list_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMembership>>;

    /// Attaches a baseline role to a team. Returns `false` when already attached.
    async fn insert_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool>;

    /// Detaches a baseline role from a team. Returns `false` when not attached.
    async fn delete_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool>;

    /// Lists baseline roles of a team ordered by name.
    async fn list_team_roles(&self, team_id: TeamId) -> AppResult<Vec<Role>>;

    /// Grants a role to one member within a team. Returns `false` when already granted.
    async fn insert_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool>;

    /// Removes a role from one member within a team. Returns `false` when not granted.
    async fn delete_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool>;

    /// Lists roles granted to one member within a team ordered by name.
    async fn list_member_roles(&self, team_id: TeamId, user_id: UserId) -> AppResult<Vec<Role>>;
}
