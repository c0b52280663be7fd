use async_trait::async_trait;

use shopgate_core::{AppResult, RoleId, UserId};
use shopgate_domain::{PermissionString, Role};

/// Grant of one role resolved to its wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoleGrant {
    /// Role holding the grant.
    pub role_id: RoleId,
    /// Granted `resource:action` pair.
    pub permission: PermissionString,
}

/// Role memberships and grants of one principal read at a single point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrincipalSnapshot {
    /// Role named by the identity, when it exists.
    pub direct_role: Option<Role>,
    /// Baseline roles of every team the user belongs to.
    pub team_roles: Vec<Role>,
    /// Roles granted to the user within specific teams.
    pub member_roles: Vec<Role>,
    /// Grants of every role listed above, active or not.
    pub grants: Vec<ResolvedRoleGrant>,
}

/// Repository port for principal aggregation reads.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Loads role memberships and grants for a user from one consistent snapshot.
    async fn load_principal_snapshot(
        &self,
        user_id: UserId,
        direct_role_name: &str,
    ) -> AppResult<PrincipalSnapshot>;
}
