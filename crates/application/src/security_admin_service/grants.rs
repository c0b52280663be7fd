use super::*;

use shopgate_domain::{Action, PermissionString, ROLE_SUBJECT, RoleGrant};

use crate::bulk::{
    BulkAddResult, BulkItemOutcome, BulkRemoveResult, apply_each, ensure_non_empty,
};
use crate::security_admin_ports::{GrantResult, RevokeResult};

impl SecurityAdminService {
    /// Grants a permission on a resource to a role.
    ///
    /// Granting an existing triple reports `created = false`.
    pub async fn grant(
        &self,
        principal: &Principal,
        role_id: RoleId,
        resource_id: ResourceId,
        permission_id: PermissionId,
    ) -> AppResult<GrantResult> {
        principal.require(Action::Edit, ROLE_SUBJECT)?;

        let role = self.load_role(role_id).await?;
        let resource = self.load_resource(resource_id).await?;
        let permission = self.load_permission(permission_id).await?;

        let created = self
            .grant_repository
            .insert_grant(RoleGrant {
                role_id,
                resource_id,
                permission_id,
            })
            .await?;

        if created {
            self.record(
                principal,
                AuditAction::RoleGrantsAdded,
                "rbac_role_grant",
                role_id.to_string(),
                format!(
                    "granted '{}:{}' to role '{}'",
                    resource.name(),
                    permission.action(),
                    role.name()
                ),
            )
            .await?;
        }

        Ok(GrantResult { created })
    }

    /// Revokes a permission on a resource from a role.
    ///
    /// Revoking an absent triple reports `removed = false`.
    pub async fn revoke(
        &self,
        principal: &Principal,
        role_id: RoleId,
        resource_id: ResourceId,
        permission_id: PermissionId,
    ) -> AppResult<RevokeResult> {
        principal.require(Action::Edit, ROLE_SUBJECT)?;

        let role = self.load_role(role_id).await?;
        let resource = self.load_resource(resource_id).await?;
        let permission = self.load_permission(permission_id).await?;

        let removed = self
            .grant_repository
            .delete_grant(RoleGrant {
                role_id,
                resource_id,
                permission_id,
            })
            .await?;

        if removed {
            self.record(
                principal,
                AuditAction::RoleGrantsRemoved,
                "rbac_role_grant",
                role_id.to_string(),
                format!(
                    "revoked '{}:{}' from role '{}'",
                    resource.name(),
                    permission.action(),
                    role.name()
                ),
            )
            .await?;
        }

        Ok(RevokeResult { removed })
    }

    /// Lists the resolved grants of a role.
    pub async fn grants_for_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionString>> {
        principal.require(Action::View, ROLE_SUBJECT)?;

        self.load_role(role_id).await?;
        self.grant_repository.list_role_grants(role_id).await
    }

    /// Grants every `resource:action` key to a role, item by item.
    ///
    /// Malformed keys and unknown resources or actions are reported as item
    /// failures. The result carries the full grant set of the role.
    pub async fn add_role_grants(
        &self,
        principal: &Principal,
        role_id: RoleId,
        permissions: Vec<String>,
    ) -> AppResult<BulkAddResult<PermissionString>> {
        principal.require(Action::Edit, ROLE_SUBJECT)?;
        ensure_non_empty(&permissions, "permission")?;

        let role = self.load_role(role_id).await?;
        let service = self;
        let outcome = apply_each(permissions, move |key: String| async move {
            let grant = service.resolve_grant(role_id, key.as_str()).await?;
            if service.grant_repository.insert_grant(grant).await? {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::RoleGrantsAdded,
                "rbac_role_grant",
                role_id.to_string(),
                format!(
                    "granted [{}] to role '{}'",
                    outcome.succeeded.join(", "),
                    role.name()
                ),
            )
            .await;
        }

        let associations = self.grant_repository.list_role_grants(role_id).await?;
        Ok(outcome.into_add_result(associations))
    }

    /// Revokes every `resource:action` key from a role, item by item.
    ///
    /// Keys naming grants the role does not hold count as skipped.
    pub async fn remove_role_grants(
        &self,
        principal: &Principal,
        role_id: RoleId,
        permissions: Vec<String>,
    ) -> AppResult<BulkRemoveResult> {
        principal.require(Action::Edit, ROLE_SUBJECT)?;
        ensure_non_empty(&permissions, "permission")?;

        let role = self.load_role(role_id).await?;
        let service = self;
        let outcome = apply_each(permissions, move |key: String| async move {
            let grant = match service.resolve_grant(role_id, key.as_str()).await {
                Ok(grant) => grant,
                Err(AppError::NotFound(_)) => return Ok(BulkItemOutcome::Skipped),
                Err(error) => return Err(error),
            };

            if service.grant_repository.delete_grant(grant).await? {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::RoleGrantsRemoved,
                "rbac_role_grant",
                role_id.to_string(),
                format!(
                    "revoked [{}] from role '{}'",
                    outcome.succeeded.join(", "),
                    role.name()
                ),
            )
            .await;
        }

        Ok(outcome.into_remove_result("grants"))
    }

    async fn resolve_grant(&self, role_id: RoleId, key: &str) -> AppResult<RoleGrant> {
        let permission_string = PermissionString::from_transport(key)?;

        let resource = self
            .catalog_repository
            .find_resource_by_name(permission_string.resource().as_str())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "resource '{}' does not exist",
                    permission_string.resource()
                ))
            })?;
        let permission = self
            .catalog_repository
            .find_permission_by_action(permission_string.action())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission '{}' does not exist",
                    permission_string.action()
                ))
            })?;

        Ok(RoleGrant {
            role_id,
            resource_id: resource.id(),
            permission_id: permission.id(),
        })
    }
}
