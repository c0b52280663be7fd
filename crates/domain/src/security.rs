use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a permission verb and its grants are deleted.
    CatalogPermissionDeleted,
    /// Emitted when a resource is added to the catalog.
    CatalogResourceCreated,
    /// Emitted when resource attributes change.
    CatalogResourceUpdated,
    /// Emitted when a resource and its grants are deleted.
    CatalogResourceDeleted,
    /// Emitted when a role is created.
    RoleCreated,
    /// Emitted when role attributes change.
    RoleUpdated,
    /// Emitted when a role and its grants are deleted.
    RoleDeleted,
    /// Emitted when grants are added to a role.
    RoleGrantsAdded,
    /// Emitted when grants are removed from a role.
    RoleGrantsRemoved,
    /// Emitted when a team is created.
    TeamCreated,
    /// Emitted when team attributes change.
    TeamUpdated,
    /// Emitted when a team and its associations are deleted.
    TeamDeleted,
    /// Emitted when a user joins a team.
    TeamMemberAdded,
    /// Emitted when a user leaves a team.
    TeamMemberRemoved,
    /// Emitted when baseline roles are attached to a team.
    TeamRolesAdded,
    /// Emitted when baseline roles are detached from a team.
    TeamRolesRemoved,
    /// Emitted when roles are granted to a member within a team.
    MemberRolesAdded,
    /// Emitted when roles are removed from a member within a team.
    MemberRolesRemoved,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogPermissionDeleted => "catalog.permission.deleted",
            Self::CatalogResourceCreated => "catalog.resource.created",
            Self::CatalogResourceUpdated => "catalog.resource.updated",
            Self::CatalogResourceDeleted => "catalog.resource.deleted",
            Self::RoleCreated => "security.role.created",
            Self::RoleUpdated => "security.role.updated",
            Self::RoleDeleted => "security.role.deleted",
            Self::RoleGrantsAdded => "security.role.grants_added",
            Self::RoleGrantsRemoved => "security.role.grants_removed",
            Self::TeamCreated => "security.team.created",
            Self::TeamUpdated => "security.team.updated",
            Self::TeamDeleted => "security.team.deleted",
            Self::TeamMemberAdded => "security.team.member_added",
            Self::TeamMemberRemoved => "security.team.member_removed",
            Self::TeamRolesAdded => "security.team.roles_added",
            Self::TeamRolesRemoved => "security.team.roles_removed",
            Self::MemberRolesAdded => "security.member.roles_added",
            Self::MemberRolesRemoved => "security.member.roles_removed",
        }
    }
}
