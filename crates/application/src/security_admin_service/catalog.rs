use super::*;

use shopgate_domain::{
    Action, PERMISSION_SUBJECT, RESOURCE_SUBJECT, ROLE_SUBJECT, ResourceChanges, RoleFlags,
    SUPER_ADMIN_ROLE_NAME, reserved_subjects,
};

use crate::security_admin_ports::CreateResourceInput;

/// Catalog rows guaranteed to exist after [`SecurityAdminService::bootstrap_catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Every permission verb, ordered by action.
    pub permissions: Vec<PermissionDefinition>,
    /// Resources guarding the administration operations.
    pub reserved_resources: Vec<ResourceDefinition>,
    /// The seeded super-admin role.
    pub super_admin_role: Role,
}

impl SecurityAdminService {
    /// Idempotently seeds permission verbs, reserved resources and the super-admin role.
    ///
    /// Start-up only; runs without a principal.
    pub async fn bootstrap_catalog(&self) -> AppResult<BootstrapReport> {
        let mut permissions = Vec::with_capacity(Action::all().len());
        for action in Action::all() {
            let permission = PermissionDefinition::new(
                PermissionId::new(),
                *action,
                action.display_name(),
                None,
            )?;
            permissions.push(self.catalog_repository.ensure_permission(permission).await?);
        }

        let mut reserved_resources = Vec::with_capacity(reserved_subjects().len());
        for subject in reserved_subjects() {
            let resource = match self.catalog_repository.find_resource_by_name(subject).await? {
                Some(resource) => resource,
                None => {
                    let resource = ResourceDefinition::new(
                        ResourceId::new(),
                        *subject,
                        reserved_display_name(subject),
                        Some(format!("Administration of {subject} records")),
                        true,
                    )?;
                    self.catalog_repository
                        .create_resource(resource.clone())
                        .await?;
                    resource
                }
            };
            reserved_resources.push(resource);
        }

        let super_admin_role = match self
            .role_repository
            .find_role_by_name(SUPER_ADMIN_ROLE_NAME)
            .await?
        {
            Some(role) => role,
            None => {
                let role = Role::new(
                    RoleId::new(),
                    SUPER_ADMIN_ROLE_NAME,
                    "Super administrator",
                    Some("Bypasses every ability check".to_owned()),
                    RoleFlags::super_admin(),
                    None,
                )?;
                self.role_repository.create_role(role.clone()).await?;
                role
            }
        };

        Ok(BootstrapReport {
            permissions,
            reserved_resources,
            super_admin_role,
        })
    }

    /// Lists permission verbs.
    pub async fn list_permissions(
        &self,
        principal: &Principal,
    ) -> AppResult<Vec<PermissionDefinition>> {
        principal.require(Action::View, PERMISSION_SUBJECT)?;
        self.catalog_repository.list_permissions().await
    }

    /// Deletes a permission verb together with every grant using it.
    pub async fn delete_permission(
        &self,
        principal: &Principal,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        principal.require(Action::Delete, PERMISSION_SUBJECT)?;

        let permission = self.load_permission(permission_id).await?;
        if !self
            .catalog_repository
            .delete_permission(permission_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        self.record(
            principal,
            AuditAction::CatalogPermissionDeleted,
            "rbac_permission",
            permission_id.to_string(),
            format!("deleted permission '{}'", permission.action()),
        )
        .await
    }

    /// Lists catalog resources.
    pub async fn list_resources(
        &self,
        principal: &Principal,
    ) -> AppResult<Vec<ResourceDefinition>> {
        principal.require(Action::View, RESOURCE_SUBJECT)?;
        self.catalog_repository.list_resources().await
    }

    /// Adds a resource to the catalog.
    pub async fn create_resource(
        &self,
        principal: &Principal,
        input: CreateResourceInput,
    ) -> AppResult<ResourceDefinition> {
        principal.require(Action::Create, RESOURCE_SUBJECT)?;

        let resource = ResourceDefinition::new(
            ResourceId::new(),
            input.name,
            input.display_name,
            input.description,
            true,
        )?;
        if self
            .catalog_repository
            .find_resource_by_name(resource.name().as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Validation(format!(
                "resource '{}' already exists",
                resource.name()
            )));
        }

        self.catalog_repository
            .create_resource(resource.clone())
            .await?;

        self.record(
            principal,
            AuditAction::CatalogResourceCreated,
            "rbac_resource",
            resource.id().to_string(),
            format!("created resource '{}'", resource.name()),
        )
        .await?;

        Ok(resource)
    }

    /// Updates mutable resource attributes.
    pub async fn update_resource(
        &self,
        principal: &Principal,
        resource_id: ResourceId,
        changes: ResourceChanges,
    ) -> AppResult<ResourceDefinition> {
        principal.require(Action::Edit, RESOURCE_SUBJECT)?;

        let mut resource = self.load_resource(resource_id).await?;
        resource.apply_changes(changes)?;
        self.catalog_repository
            .update_resource(resource.clone())
            .await?;

        self.record(
            principal,
            AuditAction::CatalogResourceUpdated,
            "rbac_resource",
            resource_id.to_string(),
            format!("updated resource '{}'", resource.name()),
        )
        .await?;

        Ok(resource)
    }

    /// Deletes a resource together with every grant targeting it.
    pub async fn delete_resource(
        &self,
        principal: &Principal,
        resource_id: ResourceId,
    ) -> AppResult<()> {
        principal.require(Action::Delete, RESOURCE_SUBJECT)?;

        let resource = self.load_resource(resource_id).await?;
        if !self.catalog_repository.delete_resource(resource_id).await? {
            return Err(AppError::NotFound(format!(
                "resource '{resource_id}' does not exist"
            )));
        }

        self.record(
            principal,
            AuditAction::CatalogResourceDeleted,
            "rbac_resource",
            resource_id.to_string(),
            format!("deleted resource '{}'", resource.name()),
        )
        .await
    }
}

fn reserved_display_name(subject: &str) -> &'static str {
    match subject {
        ROLE_SUBJECT => "Roles",
        RESOURCE_SUBJECT => "Resources",
        PERMISSION_SUBJECT => "Permissions",
        _ => "Teams",
    }
}
