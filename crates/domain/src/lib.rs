//! Domain entities and invariants of the authorization engine.

#![forbid(unsafe_code)]

mod ability;
mod catalog;
mod grant;
mod role;
mod security;
mod team;

pub use ability::{Ability, AbilitySnapshot};
pub use catalog::{
    Action, IdentifierName, NAME_MAX_LENGTH, PERMISSION_SUBJECT, PermissionDefinition,
    RESOURCE_SUBJECT, ROLE_SUBJECT, ResourceChanges, ResourceDefinition, TEAM_SUBJECT,
    WILDCARD_SUBJECT, reserved_subjects,
};
pub use grant::{PermissionString, RoleGrant};
pub use role::{Role, RoleChanges, RoleFlags, SUPER_ADMIN_ROLE_NAME};
pub use security::AuditAction;
pub use team::{MemberTeamRole, Team, TeamChanges, TeamMembership, TeamRoleBinding};
