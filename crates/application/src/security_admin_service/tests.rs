use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use shopgate_core::{
    AppError, AppResult, PermissionId, ResourceId, RoleId, TeamId, UserId, UserIdentity,
};
use shopgate_domain::{
    Ability, Action, AuditAction, PermissionDefinition, PermissionString, ResourceDefinition,
    Role, RoleChanges, RoleGrant, Team, TeamMembership, TeamRoleBinding,
};

use crate::guard::Principal;
use crate::security_admin_ports::{
    AuditEvent, AuditRepository, CatalogRepository, CreateResourceInput, CreateRoleInput,
    CreateTeamInput, GrantMatrixRepository, RoleRepository, TeamRepository,
};

use super::SecurityAdminService;

#[derive(Default)]
struct FakeState {
    permissions: Vec<PermissionDefinition>,
    resources: Vec<ResourceDefinition>,
    roles: Vec<Role>,
    grants: BTreeSet<RoleGrant>,
    teams: Vec<Team>,
    members: Vec<TeamMembership>,
    team_roles: HashSet<TeamRoleBinding>,
    member_roles: HashSet<(TeamId, UserId, RoleId)>,
    events: Vec<AuditEvent>,
    audit_unavailable: bool,
}

#[derive(Default)]
struct FakeStore {
    state: Mutex<FakeState>,
}

#[async_trait]
impl CatalogRepository for FakeStore {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        Ok(self.state.lock().await.permissions.clone())
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.id() == id)
            .cloned())
    }

    async fn find_permission_by_action(
        &self,
        action: Action,
    ) -> AppResult<Option<PermissionDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .permissions
            .iter()
            .find(|permission| permission.action() == action)
            .cloned())
    }

    async fn ensure_permission(
        &self,
        permission: PermissionDefinition,
    ) -> AppResult<PermissionDefinition> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .permissions
            .iter()
            .find(|stored| stored.action() == permission.action())
        {
            return Ok(existing.clone());
        }

        state.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.permissions.len();
        state.permissions.retain(|permission| permission.id() != id);
        state.grants.retain(|grant| grant.permission_id != id);
        Ok(state.permissions.len() != before)
    }

    async fn list_resources(&self) -> AppResult<Vec<ResourceDefinition>> {
        Ok(self.state.lock().await.resources.clone())
    }

    async fn find_resource(&self, id: ResourceId) -> AppResult<Option<ResourceDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .resources
            .iter()
            .find(|resource| resource.id() == id)
            .cloned())
    }

    async fn find_resource_by_name(&self, name: &str) -> AppResult<Option<ResourceDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .resources
            .iter()
            .find(|resource| resource.name().as_str() == name)
            .cloned())
    }

    async fn create_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        self.state.lock().await.resources.push(resource);
        Ok(())
    }

    async fn update_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(stored) = state
            .resources
            .iter_mut()
            .find(|stored| stored.id() == resource.id())
        {
            *stored = resource;
        }
        Ok(())
    }

    async fn delete_resource(&self, id: ResourceId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.resources.len();
        state.resources.retain(|resource| resource.id() != id);
        state.grants.retain(|grant| grant.resource_id != id);
        Ok(state.resources.len() != before)
    }
}

#[async_trait]
impl RoleRepository for FakeStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.state.lock().await.roles.clone())
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|role| role.id() == id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| role.name().as_str() == name)
            .cloned())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        self.state.lock().await.roles.push(role);
        Ok(())
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(stored) = state.roles.iter_mut().find(|stored| stored.id() == role.id()) {
            *stored = role;
        }
        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.roles.len();
        state.roles.retain(|role| role.id() != id);
        state.grants.retain(|grant| grant.role_id != id);
        Ok(state.roles.len() != before)
    }
}

#[async_trait]
impl GrantMatrixRepository for FakeStore {
    async fn insert_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        Ok(self.state.lock().await.grants.insert(grant))
    }

    async fn delete_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        Ok(self.state.lock().await.grants.remove(&grant))
    }

    async fn list_role_grants(&self, role_id: RoleId) -> AppResult<Vec<PermissionString>> {
        let state = self.state.lock().await;
        let mut resolved = Vec::new();
        for grant in state.grants.iter().filter(|grant| grant.role_id == role_id) {
            let resource = state
                .resources
                .iter()
                .find(|resource| resource.id() == grant.resource_id);
            let permission = state
                .permissions
                .iter()
                .find(|permission| permission.id() == grant.permission_id);
            if let (Some(resource), Some(permission)) = (resource, permission) {
                resolved.push(PermissionString::new(
                    resource.name().clone(),
                    permission.action(),
                ));
            }
        }
        resolved.sort();
        Ok(resolved)
    }
}

#[async_trait]
impl TeamRepository for FakeStore {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        Ok(self.state.lock().await.teams.clone())
    }

    async fn find_team(&self, id: TeamId) -> AppResult<Option<Team>> {
        let state = self.state.lock().await;
        Ok(state.teams.iter().find(|team| team.id() == id).cloned())
    }

    async fn create_team(&self, team: Team) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.teams.iter().any(|stored| stored.name() == team.name()) {
            return Err(AppError::Validation(format!(
                "team '{}' already exists",
                team.name()
            )));
        }
        state.teams.push(team);
        Ok(())
    }

    async fn update_team(&self, team: Team) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(stored) = state.teams.iter_mut().find(|stored| stored.id() == team.id()) {
            *stored = team;
        }
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.teams.len();
        state.teams.retain(|team| team.id() != id);
        state.members.retain(|membership| membership.team_id != id);
        state.team_roles.retain(|binding| binding.team_id != id);
        state.member_roles.retain(|(team_id, _, _)| *team_id != id);
        Ok(state.teams.len() != before)
    }

    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if state
            .members
            .iter()
            .any(|membership| membership.team_id == team_id && membership.user_id == user_id)
        {
            return Ok(false);
        }
        state.members.push(TeamMembership {
            user_id,
            team_id,
            joined_at: Utc::now(),
        });
        Ok(true)
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.members.len();
        state
            .members
            .retain(|membership| !(membership.team_id == team_id && membership.user_id == user_id));
        state
            .member_roles
            .retain(|(stored_team, stored_user, _)| {
                !(*stored_team == team_id && *stored_user == user_id)
            });
        Ok(state.members.len() != before)
    }

    async fn is_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .any(|membership| membership.team_id == team_id && membership.user_id == user_id))
    }

    async fn list_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMembership>> {
        let state = self.state.lock().await;
        Ok(state
            .members
            .iter()
            .filter(|membership| membership.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn insert_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        Ok(self.state.lock().await.team_roles.insert(binding))
    }

    async fn delete_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        Ok(self.state.lock().await.team_roles.remove(&binding))
    }

    async fn list_team_roles(&self, team_id: TeamId) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .filter(|role| {
                state.team_roles.contains(&TeamRoleBinding {
                    team_id,
                    role_id: role.id(),
                })
            })
            .cloned()
            .collect())
    }

    async fn insert_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .member_roles
            .insert((team_id, user_id, role_id)))
    }

    async fn delete_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .member_roles
            .remove(&(team_id, user_id, role_id)))
    }

    async fn list_member_roles(&self, team_id: TeamId, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .filter(|role| state.member_roles.contains(&(team_id, user_id, role.id())))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuditRepository for FakeStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.audit_unavailable {
            return Err(AppError::Internal("audit log unavailable".to_owned()));
        }
        state.events.push(event);
        Ok(())
    }
}

struct Fixture {
    store: Arc<FakeStore>,
    service: SecurityAdminService,
}

async fn fixture() -> Fixture {
    let store = Arc::new(FakeStore::default());
    let service = SecurityAdminService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let bootstrapped = service.bootstrap_catalog().await;
    assert!(bootstrapped.is_ok());

    Fixture { store, service }
}

fn principal(ability: Ability) -> Principal {
    Principal::new(UserIdentity::new(UserId::new(), "Dana", "staff"), ability)
}

fn super_admin() -> Principal {
    principal(Ability::unrestricted())
}

fn granted(values: &[&str]) -> Principal {
    principal(Ability::build(
        false,
        values
            .iter()
            .filter_map(|value| PermissionString::from_str(value).ok()),
    ))
}

fn role_input(name: &str) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        display_name: name.to_owned(),
        description: None,
    }
}

fn resource_input(name: &str) -> CreateResourceInput {
    CreateResourceInput {
        name: name.to_owned(),
        display_name: name.to_owned(),
        description: None,
    }
}

fn team_input(name: &str) -> CreateTeamInput {
    CreateTeamInput {
        name: name.to_owned(),
        display_name: name.to_owned(),
        description: None,
    }
}

async fn create_role(fixture: &Fixture, name: &str) -> Role {
    match fixture
        .service
        .create_role(&super_admin(), role_input(name))
        .await
    {
        Ok(role) => role,
        Err(error) => panic!("failed to create role '{name}': {error}"),
    }
}

async fn create_resource(fixture: &Fixture, name: &str) -> ResourceDefinition {
    match fixture
        .service
        .create_resource(&super_admin(), resource_input(name))
        .await
    {
        Ok(resource) => resource,
        Err(error) => panic!("failed to create resource '{name}': {error}"),
    }
}

async fn create_team(fixture: &Fixture, name: &str) -> Team {
    match fixture
        .service
        .create_team(&super_admin(), team_input(name))
        .await
    {
        Ok(team) => team,
        Err(error) => panic!("failed to create team '{name}': {error}"),
    }
}

async fn permission_id(fixture: &Fixture, action: Action) -> PermissionId {
    match fixture.store.find_permission_by_action(action).await {
        Ok(Some(permission)) => permission.id(),
        _ => panic!("permission '{action}' was not seeded"),
    }
}

#[tokio::test]
async fn bootstrap_catalog_is_idempotent() {
    let fixture = fixture().await;

    let second = fixture.service.bootstrap_catalog().await;
    assert!(second.is_ok());
    let Ok(report) = second else {
        return;
    };

    assert_eq!(report.permissions.len(), Action::all().len());
    assert_eq!(report.reserved_resources.len(), 4);
    assert!(report.super_admin_role.is_super_admin());
    assert!(report.super_admin_role.is_system());

    let state = fixture.store.state.lock().await;
    assert_eq!(state.permissions.len(), Action::all().len());
    assert_eq!(state.resources.len(), 4);
    assert_eq!(state.roles.len(), 1);
}

#[tokio::test]
async fn create_role_rejects_duplicates_and_invalid_names() {
    let fixture = fixture().await;
    create_role(&fixture, "sales").await;

    let duplicate = fixture
        .service
        .create_role(&super_admin(), role_input("sales"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Validation(_))));

    let invalid = fixture
        .service
        .create_role(&super_admin(), role_input("Sales Team"))
        .await;
    assert!(matches!(invalid, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn denied_principal_causes_no_side_effects() {
    let fixture = fixture().await;
    let viewer = granted(&["role:view"]);

    let result = fixture
        .service
        .create_role(&viewer, role_input("marketing"))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let listed = fixture.service.list_roles(&viewer).await;
    assert!(listed.is_ok());

    let state = fixture.store.state.lock().await;
    assert!(state.roles.iter().all(|role| role.name().as_str() != "marketing"));
    assert!(state.events.is_empty());
}

#[tokio::test]
async fn system_roles_cannot_be_deleted() {
    let fixture = fixture().await;
    let super_admin_role = fixture.store.find_role_by_name("super_admin").await;
    let Ok(Some(super_admin_role)) = super_admin_role else {
        panic!("super admin role was not seeded");
    };

    let result = fixture
        .service
        .delete_role(&super_admin(), super_admin_role.id())
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let deactivated = fixture
        .service
        .update_role(
            &super_admin(),
            super_admin_role.id(),
            RoleChanges {
                is_active: Some(false),
                ..RoleChanges::default()
            },
        )
        .await;
    assert!(matches!(deactivated, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn grant_twice_is_equivalent_to_once() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "admin").await;
    let product = create_resource(&fixture, "product").await;
    let manage = permission_id(&fixture, Action::Manage).await;
    let actor = super_admin();

    let first = fixture
        .service
        .grant(&actor, role.id(), product.id(), manage)
        .await;
    let second = fixture
        .service
        .grant(&actor, role.id(), product.id(), manage)
        .await;

    assert!(matches!(first, Ok(result) if result.created));
    assert!(matches!(second, Ok(result) if !result.created));

    let grants = fixture.service.grants_for_role(&actor, role.id()).await;
    assert!(matches!(grants, Ok(grants) if grants.len() == 1));

    let state = fixture.store.state.lock().await;
    let grant_events = state
        .events
        .iter()
        .filter(|event| event.action == AuditAction::RoleGrantsAdded)
        .count();
    assert_eq!(grant_events, 1);
}

#[tokio::test]
async fn revoke_absent_grant_reports_not_removed() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "support").await;
    let order = create_resource(&fixture, "order").await;
    let view = permission_id(&fixture, Action::View).await;

    let result = fixture
        .service
        .revoke(&super_admin(), role.id(), order.id(), view)
        .await;

    assert!(matches!(result, Ok(result) if !result.removed));
}

#[tokio::test]
async fn grant_with_unknown_ids_is_not_found() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "support").await;
    let view = permission_id(&fixture, Action::View).await;

    let result = fixture
        .service
        .grant(&super_admin(), role.id(), ResourceId::new(), view)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = fixture
        .service
        .grants_for_role(&super_admin(), RoleId::new())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn bulk_add_grants_reports_full_set_and_item_failures() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "merchandiser").await;
    create_resource(&fixture, "product").await;
    create_resource(&fixture, "order").await;
    let actor = super_admin();

    let first = fixture
        .service
        .add_role_grants(&actor, role.id(), vec!["product:view".to_owned()])
        .await;
    assert!(first.is_ok());

    let result = fixture
        .service
        .add_role_grants(
            &actor,
            role.id(),
            vec![
                "product:view".to_owned(),
                "order:edit".to_owned(),
                "not a permission".to_owned(),
                "invoice:view".to_owned(),
            ],
        )
        .await;
    let Ok(result) = result else {
        panic!("bulk add should not fail as a whole");
    };

    assert_eq!(result.created_count, 1);
    assert_eq!(result.unchanged_count, 1);
    assert_eq!(result.failures.len(), 2);
    let keys: Vec<String> = result
        .associations
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(keys, vec!["order:edit".to_owned(), "product:view".to_owned()]);
}

#[tokio::test]
async fn bulk_remove_counts_absent_keys_as_skipped() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "merchandiser").await;
    create_resource(&fixture, "product").await;
    let actor = super_admin();

    let added = fixture
        .service
        .add_role_grants(
            &actor,
            role.id(),
            vec!["product:view".to_owned(), "product:edit".to_owned()],
        )
        .await;
    assert!(added.is_ok());

    let result = fixture
        .service
        .remove_role_grants(
            &actor,
            role.id(),
            vec![
                "product:view".to_owned(),
                "product:edit".to_owned(),
                "product:delete".to_owned(),
            ],
        )
        .await;
    let Ok(result) = result else {
        panic!("bulk remove should not fail as a whole");
    };

    assert_eq!(result.removed_count, 2);
    assert_eq!(result.skipped_count, 1);
    assert_eq!(result.message, "removed 2 grants, skipped 1 already absent");
    assert!(fixture.store.state.lock().await.grants.is_empty());
}

#[tokio::test]
async fn empty_bulk_payload_is_rejected() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "merchandiser").await;

    let result = fixture
        .service
        .remove_role_grants(&super_admin(), role.id(), Vec::new())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn team_roles_bulk_add_records_malformed_keys() {
    let fixture = fixture().await;
    let team = create_team(&fixture, "sales").await;
    let viewer = create_role(&fixture, "viewer").await;
    let actor = granted(&["team:edit"]);

    let result = fixture
        .service
        .add_team_roles(
            &actor,
            team.id(),
            vec![
                viewer.id().to_string(),
                "not-a-uuid".to_owned(),
                RoleId::new().to_string(),
            ],
        )
        .await;
    let Ok(result) = result else {
        panic!("bulk add should not fail as a whole");
    };

    assert_eq!(result.created_count, 1);
    assert_eq!(result.failures.len(), 2);
    assert_eq!(result.associations, vec![viewer]);
}

#[tokio::test]
async fn member_roles_require_team_membership() {
    let fixture = fixture().await;
    let team = create_team(&fixture, "sales").await;
    let role = create_role(&fixture, "closer").await;
    let user_id = UserId::new();
    let actor = super_admin();

    let result = fixture
        .service
        .add_member_roles(&actor, team.id(), user_id, vec![role.id().to_string()])
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let joined = fixture.service.add_member(&actor, team.id(), user_id).await;
    assert!(matches!(joined, Ok(true)));

    let result = fixture
        .service
        .add_member_roles(&actor, team.id(), user_id, vec![role.id().to_string()])
        .await;
    assert!(matches!(result, Ok(result) if result.created_count == 1));
}

#[tokio::test]
async fn duplicate_team_names_are_rejected() {
    let fixture = fixture().await;
    create_team(&fixture, "sales").await;

    let result = fixture
        .service
        .create_team(&super_admin(), team_input("sales"))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn mutations_append_audit_events_with_actor() {
    let fixture = fixture().await;
    let actor = super_admin();
    let actor_id = actor.identity().user_id();

    let created = fixture
        .service
        .create_resource(&actor, resource_input("customer"))
        .await;
    let Ok(resource) = created else {
        panic!("resource creation failed");
    };
    let deleted = fixture
        .service
        .delete_resource(&actor, resource.id())
        .await;
    assert!(deleted.is_ok());

    let state = fixture.store.state.lock().await;
    let actions: Vec<AuditAction> = state.events.iter().map(|event| event.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::CatalogResourceCreated,
            AuditAction::CatalogResourceDeleted
        ]
    );
    assert!(state.events.iter().all(|event| event.actor == actor_id));
}

async fn join_with_roles(fixture: &Fixture, team: &Team, user_id: UserId, roles: &[&Role]) {
    let actor = super_admin();
    let joined = fixture.service.add_member(&actor, team.id(), user_id).await;
    assert!(matches!(joined, Ok(true)));

    let added = fixture
        .service
        .add_member_roles(
            &actor,
            team.id(),
            user_id,
            roles.iter().map(|role| role.id().to_string()).collect(),
        )
        .await;
    assert!(matches!(added, Ok(result) if result.created_count == roles.len()));
}

#[tokio::test]
async fn member_roles_bulk_remove_counts_present_absent_and_malformed_keys() {
    let fixture = fixture().await;
    let team = create_team(&fixture, "sales").await;
    let closer = create_role(&fixture, "closer").await;
    let opener = create_role(&fixture, "opener").await;
    let auditor = create_role(&fixture, "auditor").await;
    let user_id = UserId::new();
    join_with_roles(&fixture, &team, user_id, &[&closer, &opener]).await;

    let result = fixture
        .service
        .remove_member_roles(
            &granted(&["team:edit"]),
            team.id(),
            user_id,
            vec![
                closer.id().to_string(),
                opener.id().to_string(),
                auditor.id().to_string(),
                "not-a-uuid".to_owned(),
            ],
        )
        .await;
    let Ok(result) = result else {
        panic!("bulk remove should not fail as a whole");
    };

    assert_eq!(result.removed_count, 2);
    assert_eq!(result.skipped_count, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].key, "not-a-uuid");

    let remaining = fixture
        .service
        .member_roles(&super_admin(), team.id(), user_id)
        .await;
    assert!(matches!(remaining, Ok(roles) if roles.is_empty()));
}

#[tokio::test]
async fn member_roles_bulk_remove_after_leaving_team_is_skipped() {
    let fixture = fixture().await;
    let team = create_team(&fixture, "sales").await;
    let closer = create_role(&fixture, "closer").await;
    let opener = create_role(&fixture, "opener").await;
    let user_id = UserId::new();
    let actor = super_admin();
    join_with_roles(&fixture, &team, user_id, &[&closer, &opener]).await;

    let left = fixture
        .service
        .remove_member(&actor, team.id(), user_id)
        .await;
    assert!(matches!(left, Ok(true)));

    let retried = fixture
        .service
        .remove_member_roles(&actor, team.id(), user_id, vec![closer.id().to_string()])
        .await;

    assert!(matches!(
        retried,
        Ok(result) if result.removed_count == 0 && result.skipped_count == 1
    ));

    let unknown_team = fixture
        .service
        .remove_member_roles(&actor, TeamId::new(), user_id, vec![closer.id().to_string()])
        .await;
    assert!(matches!(unknown_team, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn team_roles_bulk_remove_skips_duplicate_keys() {
    let fixture = fixture().await;
    let team = create_team(&fixture, "sales").await;
    let viewer = create_role(&fixture, "viewer").await;
    let actor = super_admin();

    let added = fixture
        .service
        .add_team_roles(&actor, team.id(), vec![viewer.id().to_string()])
        .await;
    assert!(added.is_ok());

    let result = fixture
        .service
        .remove_team_roles(
            &actor,
            team.id(),
            vec![
                viewer.id().to_string(),
                viewer.id().to_string(),
                RoleId::new().to_string(),
            ],
        )
        .await;
    let Ok(result) = result else {
        panic!("bulk remove should not fail as a whole");
    };

    assert_eq!(result.removed_count, 1);
    assert_eq!(result.skipped_count, 2);
    assert!(result.failures.is_empty());
    assert_eq!(result.message, "removed 1 roles, skipped 2 already absent");

    let remaining = fixture.service.team_roles(&actor, team.id()).await;
    assert!(matches!(remaining, Ok(roles) if roles.is_empty()));
}

#[tokio::test]
async fn bulk_result_survives_audit_failure() {
    let fixture = fixture().await;
    let role = create_role(&fixture, "merchandiser").await;
    create_resource(&fixture, "product").await;
    fixture.store.state.lock().await.audit_unavailable = true;

    let result = fixture
        .service
        .add_role_grants(
            &super_admin(),
            role.id(),
            vec!["product:view".to_owned(), "product:edit".to_owned()],
        )
        .await;

    assert!(matches!(result, Ok(result) if result.created_count == 2));
    assert_eq!(fixture.store.state.lock().await.grants.len(), 2);

    let single = fixture
        .service
        .create_role(&super_admin(), role_input("buyer"))
        .await;
    assert!(matches!(single, Err(AppError::Internal(_))));
}
