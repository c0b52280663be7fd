use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use shopgate_core::{AppError, AppResult, RoleId, UserIdentity};
use shopgate_domain::{Ability, PermissionString, Role};

use crate::authorization_ports::{AuthorizationRepository, PrincipalSnapshot};
use crate::guard::Principal;

/// Effective roles and permissions of one principal, taken from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveAccess {
    /// Active effective roles, deduplicated and ordered by name.
    pub roles: Vec<Role>,
    /// Union of the grants of the effective roles.
    pub permissions: BTreeSet<PermissionString>,
    /// Whether any effective role carries the super-admin capability.
    pub is_super_admin: bool,
}

impl EffectiveAccess {
    /// Builds the ability object for this access set.
    #[must_use]
    pub fn ability(&self) -> Ability {
        Ability::build(self.is_super_admin, self.permissions.iter().cloned())
    }
}

/// Application service aggregating principal roles into abilities.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Returns the active effective roles of a user.
    pub async fn effective_roles(&self, identity: &UserIdentity) -> AppResult<Vec<Role>> {
        Ok(self.effective_access(identity).await?.roles)
    }

    /// Returns effective roles, permissions and super-admin flag from one snapshot.
    pub async fn effective_access(&self, identity: &UserIdentity) -> AppResult<EffectiveAccess> {
        let snapshot = self
            .repository
            .load_principal_snapshot(identity.user_id(), identity.direct_role_name())
            .await?;

        aggregate_snapshot(identity, snapshot)
    }

    /// Builds the ability object of a user.
    pub async fn ability_for(&self, identity: &UserIdentity) -> AppResult<Ability> {
        Ok(self.effective_access(identity).await?.ability())
    }

    /// Resolves a user identity into a principal carrying its ability.
    pub async fn principal(&self, identity: UserIdentity) -> AppResult<Principal> {
        let ability = self.ability_for(&identity).await?;
        Ok(Principal::new(identity, ability))
    }
}

/// Unions direct, team baseline and per-member roles and drops inactive ones.
pub(crate) fn aggregate_snapshot(
    identity: &UserIdentity,
    snapshot: PrincipalSnapshot,
) -> AppResult<EffectiveAccess> {
    let PrincipalSnapshot {
        direct_role,
        team_roles,
        member_roles,
        grants,
    } = snapshot;

    let direct_role = direct_role.ok_or_else(|| {
        AppError::NotFound(format!(
            "direct role '{}' of user '{}' was not found",
            identity.direct_role_name(),
            identity.user_id()
        ))
    })?;

    let mut seen: HashSet<RoleId> = HashSet::new();
    let mut roles: Vec<Role> = std::iter::once(direct_role)
        .chain(team_roles)
        .chain(member_roles)
        .filter(|role| seen.insert(role.id()))
        .filter(Role::is_active)
        .collect();
    roles.sort_by(|left, right| left.name().cmp(right.name()));

    let active_role_ids: HashSet<RoleId> = roles.iter().map(Role::id).collect();
    let permissions = grants
        .into_iter()
        .filter(|grant| active_role_ids.contains(&grant.role_id))
        .map(|grant| grant.permission)
        .collect();
    let is_super_admin = roles.iter().any(Role::is_super_admin);

    Ok(EffectiveAccess {
        roles,
        permissions,
        is_super_admin,
    })
}

#[cfg(test)]
mod tests;
