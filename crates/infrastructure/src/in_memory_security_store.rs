use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use shopgate_application::{
    AuditEvent, AuditRepository, AuthorizationRepository, PrincipalSnapshot, ResolvedRoleGrant,
};
use shopgate_core::{AppResult, PermissionId, ResourceId, RoleId, TeamId, UserId};
use shopgate_domain::{
    PermissionDefinition, PermissionString, ResourceDefinition, Role, RoleGrant, Team,
    TeamRoleBinding,
};

mod catalog;
mod roles;
mod teams;

/// In-memory implementation of every authorization storage port.
///
/// All tables live behind one lock, so a principal snapshot is read
/// atomically with respect to concurrent writers.
#[derive(Debug, Default)]
pub struct InMemorySecurityStore {
    state: RwLock<SecurityState>,
}

#[derive(Debug, Default)]
struct SecurityState {
    permissions: HashMap<PermissionId, PermissionDefinition>,
    resources: HashMap<ResourceId, ResourceDefinition>,
    roles: HashMap<RoleId, Role>,
    grants: BTreeSet<RoleGrant>,
    teams: HashMap<TeamId, Team>,
    memberships: BTreeMap<(TeamId, UserId), DateTime<Utc>>,
    team_roles: HashSet<TeamRoleBinding>,
    member_roles: BTreeMap<(TeamId, UserId, RoleId), DateTime<Utc>>,
    audit_events: Vec<AuditEvent>,
}

impl SecurityState {
    fn resolve_grant(&self, grant: &RoleGrant) -> Option<PermissionString> {
        let resource = self.resources.get(&grant.resource_id)?;
        let permission = self.permissions.get(&grant.permission_id)?;

        Some(PermissionString::new(
            resource.name().clone(),
            permission.action(),
        ))
    }

    fn roles_sorted(&self, role_ids: impl IntoIterator<Item = RoleId>) -> Vec<Role> {
        let mut roles: Vec<Role> = role_ids
            .into_iter()
            .filter_map(|role_id| self.roles.get(&role_id).cloned())
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        roles
    }
}

impl InMemorySecurityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the audit events appended so far, oldest first.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.read().await.audit_events.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemorySecurityStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.write().await.audit_events.push(event);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for InMemorySecurityStore {
    async fn load_principal_snapshot(
        &self,
        user_id: UserId,
        direct_role_name: &str,
    ) -> AppResult<PrincipalSnapshot> {
        let state = self.state.read().await;

        let direct_role = state
            .roles
            .values()
            .find(|role| role.name().as_str() == direct_role_name)
            .cloned();

        let team_ids: HashSet<TeamId> = state
            .memberships
            .keys()
            .filter(|(_, member_id)| *member_id == user_id)
            .map(|(team_id, _)| *team_id)
            .collect();

        let team_roles = state.roles_sorted(
            state
                .team_roles
                .iter()
                .filter(|binding| team_ids.contains(&binding.team_id))
                .map(|binding| binding.role_id),
        );

        let member_roles = state.roles_sorted(
            state
                .member_roles
                .keys()
                .filter(|(_, member_id, _)| *member_id == user_id)
                .map(|(_, _, role_id)| *role_id),
        );

        let role_ids: HashSet<RoleId> = direct_role
            .iter()
            .chain(team_roles.iter())
            .chain(member_roles.iter())
            .map(Role::id)
            .collect();

        let grants = state
            .grants
            .iter()
            .filter(|grant| role_ids.contains(&grant.role_id))
            .filter_map(|grant| {
                state
                    .resolve_grant(grant)
                    .map(|permission| ResolvedRoleGrant {
                        role_id: grant.role_id,
                        permission,
                    })
            })
            .collect();

        Ok(PrincipalSnapshot {
            direct_role,
            team_roles,
            member_roles,
            grants,
        })
    }
}
