use super::*;

use shopgate_application::{CatalogRepository, GrantMatrixRepository};
use shopgate_core::AppError;
use shopgate_domain::Action;

#[async_trait]
impl CatalogRepository for InMemorySecurityStore {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        let state = self.state.read().await;

        let mut permissions: Vec<PermissionDefinition> =
            state.permissions.values().cloned().collect();
        permissions.sort_by_key(PermissionDefinition::action);
        Ok(permissions)
    }

    async fn find_permission(&self, id: PermissionId) -> AppResult<Option<PermissionDefinition>> {
        Ok(self.state.read().await.permissions.get(&id).cloned())
    }

    async fn find_permission_by_action(
        &self,
        action: Action,
    ) -> AppResult<Option<PermissionDefinition>> {
        let state = self.state.read().await;

        Ok(state
            .permissions
            .values()
            .find(|permission| permission.action() == action)
            .cloned())
    }

    async fn ensure_permission(
        &self,
        permission: PermissionDefinition,
    ) -> AppResult<PermissionDefinition> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .permissions
            .values()
            .find(|stored| stored.action() == permission.action())
        {
            return Ok(existing.clone());
        }

        state
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&self, id: PermissionId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state.permissions.remove(&id).is_none() {
            return Ok(false);
        }
        state.grants.retain(|grant| grant.permission_id != id);
        Ok(true)
    }

    async fn list_resources(&self) -> AppResult<Vec<ResourceDefinition>> {
        let state = self.state.read().await;

        let mut resources: Vec<ResourceDefinition> = state.resources.values().cloned().collect();
        resources.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(resources)
    }

    async fn find_resource(&self, id: ResourceId) -> AppResult<Option<ResourceDefinition>> {
        Ok(self.state.read().await.resources.get(&id).cloned())
    }

    async fn find_resource_by_name(&self, name: &str) -> AppResult<Option<ResourceDefinition>> {
        let state = self.state.read().await;

        Ok(state
            .resources
            .values()
            .find(|resource| resource.name().as_str() == name)
            .cloned())
    }

    async fn create_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state
            .resources
            .values()
            .any(|stored| stored.name() == resource.name())
        {
            return Err(AppError::Validation(format!(
                "resource '{}' already exists",
                resource.name()
            )));
        }

        state.resources.insert(resource.id(), resource);
        Ok(())
    }

    async fn update_resource(&self, resource: ResourceDefinition) -> AppResult<()> {
        let mut state = self.state.write().await;

        let Some(stored) = state.resources.get_mut(&resource.id()) else {
            return Err(AppError::NotFound(format!(
                "resource '{}' does not exist",
                resource.id()
            )));
        };
        *stored = resource;
        Ok(())
    }

    async fn delete_resource(&self, id: ResourceId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state.resources.remove(&id).is_none() {
            return Ok(false);
        }
        state.grants.retain(|grant| grant.resource_id != id);
        Ok(true)
    }
}

#[async_trait]
impl GrantMatrixRepository for InMemorySecurityStore {
    async fn insert_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if !state.roles.contains_key(&grant.role_id)
            || !state.resources.contains_key(&grant.resource_id)
            || !state.permissions.contains_key(&grant.permission_id)
        {
            return Err(AppError::NotFound(format!(
                "grant references a missing role, resource or permission: {grant:?}"
            )));
        }

        Ok(state.grants.insert(grant))
    }

    async fn delete_grant(&self, grant: RoleGrant) -> AppResult<bool> {
        Ok(self.state.write().await.grants.remove(&grant))
    }

    async fn list_role_grants(&self, role_id: RoleId) -> AppResult<Vec<PermissionString>> {
        let state = self.state.read().await;

        let mut grants: Vec<PermissionString> = state
            .grants
            .iter()
            .filter(|grant| grant.role_id == role_id)
            .filter_map(|grant| state.resolve_grant(grant))
            .collect();
        grants.sort();
        Ok(grants)
    }
}
