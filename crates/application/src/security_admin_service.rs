use std::sync::Arc;

use shopgate_core::{AppError, AppResult, PermissionId, ResourceId, RoleId, TeamId};
use shopgate_domain::{AuditAction, PermissionDefinition, ResourceDefinition, Role, Team};
use tracing::warn;

use crate::guard::Principal;
use crate::security_admin_ports::{
    AuditEvent, AuditRepository, CatalogRepository, GrantMatrixRepository, RoleRepository,
    TeamRepository,
};

mod catalog;
mod grants;
mod roles;
mod teams;

pub use catalog::BootstrapReport;

/// Application service for catalog, role, grant and team administration.
///
/// Every operation except [`SecurityAdminService::bootstrap_catalog`] takes the
/// calling [`Principal`] and runs its route guard before touching storage.
#[derive(Clone)]
pub struct SecurityAdminService {
    catalog_repository: Arc<dyn CatalogRepository>,
    role_repository: Arc<dyn RoleRepository>,
    grant_repository: Arc<dyn GrantMatrixRepository>,
    team_repository: Arc<dyn TeamRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        catalog_repository: Arc<dyn CatalogRepository>,
        role_repository: Arc<dyn RoleRepository>,
        grant_repository: Arc<dyn GrantMatrixRepository>,
        team_repository: Arc<dyn TeamRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            catalog_repository,
            role_repository,
            grant_repository,
            team_repository,
            audit_repository,
        }
    }

    async fn load_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn load_resource(&self, resource_id: ResourceId) -> AppResult<ResourceDefinition> {
        self.catalog_repository
            .find_resource(resource_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("resource '{resource_id}' does not exist")))
    }

    async fn load_permission(&self, permission_id: PermissionId) -> AppResult<PermissionDefinition> {
        self.catalog_repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    async fn load_team(&self, team_id: TeamId) -> AppResult<Team> {
        self.team_repository
            .find_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("team '{team_id}' does not exist")))
    }

    async fn record(
        &self,
        principal: &Principal,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                actor: principal.identity().user_id(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }

    /// Records the audit event of a bulk mutation whose items are already stored.
    ///
    /// A failed append is logged and does not fail the call.
    async fn record_bulk(
        &self,
        principal: &Principal,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) {
        if let Err(error) = self
            .record(principal, action, resource_type, resource_id.clone(), detail)
            .await
        {
            warn!(
                action = action.as_str(),
                %resource_id,
                %error,
                "bulk mutation applied without audit event"
            );
        }
    }
}

#[cfg(test)]
mod tests;
