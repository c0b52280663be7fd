use super::*;

use shopgate_domain::{Action, ROLE_SUBJECT, RoleChanges, RoleFlags};

use crate::security_admin_ports::CreateRoleInput;

impl SecurityAdminService {
    /// Lists all roles ordered by name.
    pub async fn list_roles(&self, principal: &Principal) -> AppResult<Vec<Role>> {
        principal.require(Action::View, ROLE_SUBJECT)?;
        self.role_repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, principal: &Principal, role_id: RoleId) -> AppResult<Role> {
        principal.require(Action::View, ROLE_SUBJECT)?;
        self.load_role(role_id).await
    }

    /// Creates a custom role and emits an audit event.
    pub async fn create_role(
        &self,
        principal: &Principal,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        principal.require(Action::Create, ROLE_SUBJECT)?;

        let role = Role::new(
            RoleId::new(),
            input.name,
            input.display_name,
            input.description,
            RoleFlags::custom(),
            Some(principal.identity().user_id()),
        )?;
        if self
            .role_repository
            .find_role_by_name(role.name().as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Validation(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        self.role_repository.create_role(role.clone()).await?;

        self.record(
            principal,
            AuditAction::RoleCreated,
            "rbac_role",
            role.id().to_string(),
            format!("created role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Updates mutable role attributes and emits an audit event.
    pub async fn update_role(
        &self,
        principal: &Principal,
        role_id: RoleId,
        changes: RoleChanges,
    ) -> AppResult<Role> {
        principal.require(Action::Edit, ROLE_SUBJECT)?;

        let mut role = self.load_role(role_id).await?;
        role.apply_changes(changes)?;
        self.role_repository.update_role(role.clone()).await?;

        self.record(
            principal,
            AuditAction::RoleUpdated,
            "rbac_role",
            role_id.to_string(),
            format!("updated role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a custom role with its grants and team associations.
    pub async fn delete_role(&self, principal: &Principal, role_id: RoleId) -> AppResult<()> {
        principal.require(Action::Delete, ROLE_SUBJECT)?;

        let role = self.load_role(role_id).await?;
        role.ensure_deletable()?;

        if !self.role_repository.delete_role(role_id).await? {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        self.record(
            principal,
            AuditAction::RoleDeleted,
            "rbac_role",
            role_id.to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await
    }
}
