use shopgate_application::{CatalogRepository, GrantMatrixRepository, RoleRepository};
use shopgate_core::{AppError, PermissionId, ResourceId, RoleId};
use shopgate_domain::{Action, PermissionDefinition, ResourceDefinition, Role, RoleFlags, RoleGrant};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::PostgresRoleRepository;
use crate::PostgresCatalogRepository;

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
        panic!("failed to run migrations for postgres role tests: {error}");
    }

    Some(pool)
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

async fn seed_role(repository: &PostgresRoleRepository) -> Role {
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
    assert!(repository.create_role(role.clone()).await.is_ok());
    role
}

async fn seed_grant(pool: &PgPool, role: &Role) -> RoleGrant {
    let catalog = PostgresCatalogRepository::new(pool.clone());

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

    let permission = match PermissionDefinition::new(PermissionId::new(), Action::View, "View", None)
    {
        Ok(permission) => permission,
        Err(error) => panic!("invalid test permission: {error}"),
    };
    let permission = match catalog.ensure_permission(permission).await {
        Ok(permission) => permission,
        Err(error) => panic!("failed to seed permission: {error}"),
    };

    RoleGrant {
        role_id: role.id(),
        resource_id: resource.id(),
        permission_id: permission.id(),
    }
}

#[tokio::test]
async fn grant_insert_is_idempotent() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleRepository::new(pool.clone());
    let role = seed_role(&repository).await;
    let grant = seed_grant(&pool, &role).await;

    assert!(matches!(repository.insert_grant(grant).await, Ok(true)));
    assert!(matches!(repository.insert_grant(grant).await, Ok(false)));

    let grants = repository.list_role_grants(role.id()).await;
    assert!(matches!(grants, Ok(grants) if grants.len() == 1));

    assert!(matches!(repository.delete_grant(grant).await, Ok(true)));
    assert!(matches!(repository.delete_grant(grant).await, Ok(false)));
}

#[tokio::test]
async fn grant_with_missing_role_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleRepository::new(pool.clone());
    let role = seed_role(&repository).await;
    let mut grant = seed_grant(&pool, &role).await;
    grant.role_id = RoleId::new();

    let result = repository.insert_grant(grant).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn deleting_role_cascades_grants() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleRepository::new(pool.clone());
    let role = seed_role(&repository).await;
    let grant = seed_grant(&pool, &role).await;
    assert!(repository.insert_grant(grant).await.is_ok());

    assert!(matches!(repository.delete_role(role.id()).await, Ok(true)));

    let remaining = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM rbac_role_grants
        WHERE role_id = $1
        "#,
    )
    .bind(role.id().as_uuid())
    .fetch_one(&pool)
    .await;
    assert!(matches!(remaining, Ok(0)));
}

#[tokio::test]
async fn duplicate_role_name_is_validation_error() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresRoleRepository::new(pool);
    let role = seed_role(&repository).await;

    let duplicate = match Role::new(
        RoleId::new(),
        role.name().as_str(),
        "Duplicate",
        None,
        RoleFlags::custom(),
        None,
    ) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    };

    let result = repository.create_role(duplicate).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
