use super::*;

use shopgate_application::RoleRepository;
use shopgate_core::AppError;

#[async_trait]
impl RoleRepository for InMemorySecurityStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        Ok(state.roles_sorted(state.roles.keys().copied()))
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let state = self.state.read().await;

        Ok(state
            .roles
            .values()
            .find(|role| role.name().as_str() == name)
            .cloned())
    }

    async fn create_role(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.roles.values().any(|stored| stored.name() == role.name()) {
            return Err(AppError::Validation(format!(
                "role '{}' already exists",
                role.name()
            )));
        }

        state.roles.insert(role.id(), role);
        Ok(())
    }

    async fn update_role(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;

        let Some(stored) = state.roles.get_mut(&role.id()) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.id()
            )));
        };
        *stored = role;
        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state.roles.remove(&id).is_none() {
            return Ok(false);
        }
        state.grants.retain(|grant| grant.role_id != id);
        state.team_roles.retain(|binding| binding.role_id != id);
        state
            .member_roles
            .retain(|(_, _, role_id), _| *role_id != id);
        Ok(true)
    }
}
