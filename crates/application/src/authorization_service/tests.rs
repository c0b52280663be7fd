use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use shopgate_core::{AppError, AppResult, RoleId, UserId, UserIdentity};
use shopgate_domain::{Action, PermissionString, Role, RoleChanges, RoleFlags};

use crate::authorization_ports::{AuthorizationRepository, PrincipalSnapshot, ResolvedRoleGrant};

use super::AuthorizationService;

struct FakeAuthorizationRepository {
    snapshot: PrincipalSnapshot,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn load_principal_snapshot(
        &self,
        _user_id: UserId,
        _direct_role_name: &str,
    ) -> AppResult<PrincipalSnapshot> {
        Ok(self.snapshot.clone())
    }
}

fn role(name: &str) -> Role {
    match Role::new(RoleId::new(), name, name, None, RoleFlags::custom(), None) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role '{name}': {error}"),
    }
}

fn grant(role: &Role, value: &str) -> ResolvedRoleGrant {
    match PermissionString::from_str(value) {
        Ok(permission) => ResolvedRoleGrant {
            role_id: role.id(),
            permission,
        },
        Err(error) => panic!("invalid test permission '{value}': {error}"),
    }
}

fn service(snapshot: PrincipalSnapshot) -> AuthorizationService {
    AuthorizationService::new(Arc::new(FakeAuthorizationRepository { snapshot }))
}

fn identity(direct_role_name: &str) -> UserIdentity {
    UserIdentity::new(UserId::new(), "Dana", direct_role_name)
}

#[tokio::test]
async fn admin_with_manage_on_product_can_edit_and_delete_products_only() {
    let admin = role("admin");
    let service = service(PrincipalSnapshot {
        grants: vec![grant(&admin, "product:manage")],
        direct_role: Some(admin),
        ..PrincipalSnapshot::default()
    });

    let ability = service.ability_for(&identity("admin")).await;
    assert!(ability.is_ok());
    let ability = ability.unwrap_or_else(|_| shopgate_domain::Ability::deny_all());

    assert!(ability.can(Action::Edit, "product"));
    assert!(ability.can(Action::Delete, "product"));
    assert!(ability.cannot(Action::Edit, "order"));
}

#[tokio::test]
async fn team_baseline_role_grants_view_without_create() {
    let customer = role("customer");
    let viewer = role("viewer");
    let service = service(PrincipalSnapshot {
        grants: vec![grant(&viewer, "order:view")],
        direct_role: Some(customer),
        team_roles: vec![viewer],
        member_roles: Vec::new(),
    });

    let ability = service.ability_for(&identity("customer")).await;
    let ability = ability.unwrap_or_else(|_| shopgate_domain::Ability::deny_all());

    assert!(ability.can(Action::View, "order"));
    assert!(ability.cannot(Action::Create, "order"));
}

#[tokio::test]
async fn effective_roles_are_deduplicated_and_sorted() {
    let direct = role("support");
    let shared = role("viewer");
    let extra = role("catalog_editor");
    let service = service(PrincipalSnapshot {
        direct_role: Some(direct.clone()),
        team_roles: vec![shared.clone(), shared.clone(), direct.clone()],
        member_roles: vec![extra.clone(), shared.clone()],
        grants: Vec::new(),
    });

    let roles = service
        .effective_roles(&identity("support"))
        .await
        .unwrap_or_default();
    let names: Vec<&str> = roles.iter().map(|role| role.name().as_str()).collect();

    assert_eq!(names, vec!["catalog_editor", "support", "viewer"]);
}

#[tokio::test]
async fn inactive_roles_grant_nothing() {
    let direct = role("customer");
    let mut dormant = role("merchandiser");
    let deactivated = dormant.apply_changes(RoleChanges {
        is_active: Some(false),
        ..RoleChanges::default()
    });
    assert!(deactivated.is_ok());

    let service = service(PrincipalSnapshot {
        grants: vec![grant(&dormant, "product:manage")],
        direct_role: Some(direct),
        team_roles: vec![dormant],
        member_roles: Vec::new(),
    });

    let access = service.effective_access(&identity("customer")).await;
    assert!(access.is_ok());
    let Ok(access) = access else {
        return;
    };

    assert_eq!(access.roles.len(), 1);
    assert!(access.permissions.is_empty());
    assert!(access.ability().cannot(Action::View, "product"));
}

#[tokio::test]
async fn super_admin_role_bypasses_empty_grant_matrix() {
    let super_admin = match Role::new(
        RoleId::new(),
        "super_admin",
        "Super admin",
        None,
        RoleFlags::super_admin(),
        None,
    ) {
        Ok(role) => role,
        Err(error) => panic!("invalid super admin role: {error}"),
    };
    let service = service(PrincipalSnapshot {
        direct_role: Some(role("customer")),
        member_roles: vec![super_admin],
        ..PrincipalSnapshot::default()
    });

    let ability = service
        .ability_for(&identity("customer"))
        .await
        .unwrap_or_else(|_| shopgate_domain::Ability::deny_all());

    assert!(ability.is_unrestricted());
    assert!(ability.can(Action::Delete, "order"));
    assert!(ability.can(Action::Manage, "anything"));
}

#[tokio::test]
async fn user_without_grants_is_denied_everything() {
    let service = service(PrincipalSnapshot {
        direct_role: Some(role("guest")),
        ..PrincipalSnapshot::default()
    });

    let ability = service
        .ability_for(&identity("guest"))
        .await
        .unwrap_or_else(|_| shopgate_domain::Ability::unrestricted());

    for action in Action::all() {
        assert!(ability.cannot(*action, "product"));
    }
}

#[tokio::test]
async fn missing_direct_role_is_not_found() {
    let service = service(PrincipalSnapshot::default());

    let result = service.effective_roles(&identity("ghost")).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn principal_carries_identity_and_ability() {
    let admin = role("admin");
    let service = service(PrincipalSnapshot {
        grants: vec![grant(&admin, "order:edit")],
        direct_role: Some(admin),
        ..PrincipalSnapshot::default()
    });
    let identity = identity("admin");

    let principal = service.principal(identity.clone()).await;
    assert!(principal.is_ok());
    let Ok(principal) = principal else {
        return;
    };

    assert_eq!(principal.identity(), &identity);
    assert!(principal.require(Action::Edit, "order").is_ok());
    assert!(principal.require(Action::Delete, "order").is_err());
}
