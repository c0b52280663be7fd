use shopgate_application::{
    AuthorizationRepository, CatalogRepository, GrantMatrixRepository, RoleRepository,
    TeamRepository,
};
use shopgate_core::{PermissionId, ResourceId, RoleId, TeamId, UserId};
use shopgate_domain::{
    Action, PermissionDefinition, ResourceDefinition, Role, RoleFlags, RoleGrant, Team,
    TeamRoleBinding,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresAuthorizationRepository;
use crate::{PostgresCatalogRepository, PostgresRoleRepository, PostgresTeamRepository};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres authorization tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

async fn seed_role(roles: &PostgresRoleRepository) -> Role {
    let role = match Role::new(
        RoleId::new(),
        unique_name("role"),
        "Test role",
        None,
        RoleFlags::custom(),
        None,
    ) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    };
    assert!(roles.create_role(role.clone()).await.is_ok());
    role
}

async fn seed_team(teams: &PostgresTeamRepository) -> Team {
    let team = match Team::new(TeamId::new(), unique_name("team"), "Test team", None, true, None)
    {
        Ok(team) => team,
        Err(error) => panic!("invalid test team: {error}"),
    };
    assert!(teams.create_team(team.clone()).await.is_ok());
    team
}

#[tokio::test]
async fn snapshot_collects_direct_team_and_member_roles_with_grants() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let catalog = PostgresCatalogRepository::new(pool.clone());
    let roles = PostgresRoleRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let repository = PostgresAuthorizationRepository::new(pool.clone());

    let direct = seed_role(&roles).await;
    let baseline = seed_role(&roles).await;
    let personal = seed_role(&roles).await;
    let unrelated = seed_role(&roles).await;
    let team = seed_team(&teams).await;
    let user_id = UserId::new();

    assert!(matches!(teams.add_member(team.id(), user_id).await, Ok(true)));
    let binding = TeamRoleBinding {
        team_id: team.id(),
        role_id: baseline.id(),
    };
    assert!(matches!(teams.insert_team_role(binding).await, Ok(true)));
    assert!(matches!(
        teams
            .insert_member_role(team.id(), user_id, personal.id())
            .await,
        Ok(true)
    ));

    let resource = match ResourceDefinition::new(
        ResourceId::new(),
        unique_name("resource"),
        "Test resource",
        None,
        true,
    ) {
        Ok(resource) => resource,
        Err(error) => panic!("invalid test resource: {error}"),
    };
    assert!(catalog.create_resource(resource.clone()).await.is_ok());
    let permission = match PermissionDefinition::new(PermissionId::new(), Action::Edit, "Edit", None)
    {
        Ok(permission) => permission,
        Err(error) => panic!("invalid test permission: {error}"),
    };
    let Ok(permission) = catalog.ensure_permission(permission).await else {
        panic!("failed to seed permission");
    };
    for role in [&baseline, &unrelated] {
        let grant = RoleGrant {
            role_id: role.id(),
            resource_id: resource.id(),
            permission_id: permission.id(),
        };
        assert!(roles.insert_grant(grant).await.is_ok());
    }

    let snapshot = repository
        .load_principal_snapshot(user_id, direct.name().as_str())
        .await;
    let Ok(snapshot) = snapshot else {
        panic!("failed to load snapshot");
    };

    assert_eq!(snapshot.direct_role, Some(direct));
    assert_eq!(snapshot.team_roles, vec![baseline.clone()]);
    assert_eq!(snapshot.member_roles, vec![personal]);
    assert_eq!(snapshot.grants.len(), 1);
    assert_eq!(snapshot.grants[0].role_id, baseline.id());
    assert_eq!(
        snapshot.grants[0].permission.to_string(),
        format!("{}:edit", resource.name())
    );
}

#[tokio::test]
async fn removing_membership_cascades_member_roles() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let roles = PostgresRoleRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let repository = PostgresAuthorizationRepository::new(pool);

    let direct = seed_role(&roles).await;
    let personal = seed_role(&roles).await;
    let team = seed_team(&teams).await;
    let user_id = UserId::new();

    assert!(teams.add_member(team.id(), user_id).await.is_ok());
    assert!(
        teams
            .insert_member_role(team.id(), user_id, personal.id())
            .await
            .is_ok()
    );
    assert!(matches!(teams.remove_member(team.id(), user_id).await, Ok(true)));

    let snapshot = repository
        .load_principal_snapshot(user_id, direct.name().as_str())
        .await;
    assert!(matches!(snapshot, Ok(snapshot) if snapshot.member_roles.is_empty()));
}
