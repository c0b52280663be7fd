use std::sync::Arc;

use shopgate_application::{
    AuditRepository, AuthorizationRepository, AuthorizationService, CatalogRepository,
    GrantMatrixRepository, RoleRepository, SecurityAdminService, TeamRepository,
};
use shopgate_infrastructure::{
    InMemorySecurityStore, PostgresAuditRepository, PostgresAuthorizationRepository,
    PostgresCatalogRepository, PostgresRoleRepository, PostgresTeamRepository,
};
use sqlx::PgPool;

use crate::state::AppState;

/// Port implementations backing the services of one process.
pub struct RepositorySet {
    authorization_repository: Arc<dyn AuthorizationRepository>,
    catalog_repository: Arc<dyn CatalogRepository>,
    role_repository: Arc<dyn RoleRepository>,
    grant_repository: Arc<dyn GrantMatrixRepository>,
    team_repository: Arc<dyn TeamRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RepositorySet {
    /// Wires every port to one shared in-memory store.
    pub fn in_memory(store: Arc<InMemorySecurityStore>) -> Self {
        Self {
            authorization_repository: store.clone(),
            catalog_repository: store.clone(),
            role_repository: store.clone(),
            grant_repository: store.clone(),
            team_repository: store.clone(),
            audit_repository: store,
        }
    }

    /// Wires every port to PostgreSQL adapters sharing one pool.
    pub fn postgres(pool: &PgPool) -> Self {
        let role_repository = Arc::new(PostgresRoleRepository::new(pool.clone()));

        Self {
            authorization_repository: Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
            catalog_repository: Arc::new(PostgresCatalogRepository::new(pool.clone())),
            role_repository: role_repository.clone(),
            grant_repository: role_repository,
            team_repository: Arc::new(PostgresTeamRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        }
    }
}

pub fn build_app_state(repositories: RepositorySet) -> AppState {
    AppState {
        authorization_service: AuthorizationService::new(repositories.authorization_repository),
        security_admin_service: SecurityAdminService::new(
            repositories.catalog_repository,
            repositories.role_repository,
            repositories.grant_repository,
            repositories.team_repository,
            repositories.audit_repository,
        ),
    }
}
