use super::*;

use shopgate_application::TeamRepository;
use shopgate_core::AppError;
use shopgate_domain::TeamMembership;

#[async_trait]
impl TeamRepository for InMemorySecurityStore {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        let state = self.state.read().await;

        let mut teams: Vec<Team> = state.teams.values().cloned().collect();
        teams.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(teams)
    }

    async fn find_team(&self, id: TeamId) -> AppResult<Option<Team>> {
        Ok(self.state.read().await.teams.get(&id).cloned())
    }

    async fn create_team(&self, team: Team) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.teams.values().any(|stored| stored.name() == team.name()) {
            return Err(AppError::Validation(format!(
                "team '{}' already exists",
                team.name()
            )));
        }

        state.teams.insert(team.id(), team);
        Ok(())
    }

    async fn update_team(&self, team: Team) -> AppResult<()> {
        let mut state = self.state.write().await;

        let Some(stored) = state.teams.get_mut(&team.id()) else {
            return Err(AppError::NotFound(format!(
                "team '{}' does not exist",
                team.id()
            )));
        };
        *stored = team;
        Ok(())
    }

    async fn delete_team(&self, id: TeamId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state.teams.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|(team_id, _), _| *team_id != id);
        state.team_roles.retain(|binding| binding.team_id != id);
        state
            .member_roles
            .retain(|(team_id, _, _), _| *team_id != id);
        Ok(true)
    }

    async fn add_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if !state.teams.contains_key(&team_id) {
            return Err(AppError::NotFound(format!("team '{team_id}' does not exist")));
        }
        if state.memberships.contains_key(&(team_id, user_id)) {
            return Ok(false);
        }

        state.memberships.insert((team_id, user_id), Utc::now());
        Ok(true)
    }

    async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if state.memberships.remove(&(team_id, user_id)).is_none() {
            return Ok(false);
        }
        state
            .member_roles
            .retain(|(stored_team, stored_user, _), _| {
                !(*stored_team == team_id && *stored_user == user_id)
            });
        Ok(true)
    }

    async fn is_member(&self, team_id: TeamId, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .contains_key(&(team_id, user_id)))
    }

    async fn list_members(&self, team_id: TeamId) -> AppResult<Vec<TeamMembership>> {
        let state = self.state.read().await;

        let mut members: Vec<TeamMembership> = state
            .memberships
            .iter()
            .filter(|((stored_team, _), _)| *stored_team == team_id)
            .map(|((team_id, user_id), joined_at)| TeamMembership {
                user_id: *user_id,
                team_id: *team_id,
                joined_at: *joined_at,
            })
            .collect();
        members.sort_by_key(|membership| (membership.joined_at, membership.user_id));
        Ok(members)
    }

    async fn insert_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if !state.teams.contains_key(&binding.team_id) {
            return Err(AppError::NotFound(format!(
                "team '{}' does not exist",
                binding.team_id
            )));
        }
        if !state.roles.contains_key(&binding.role_id) {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                binding.role_id
            )));
        }

        Ok(state.team_roles.insert(binding))
    }

    async fn delete_team_role(&self, binding: TeamRoleBinding) -> AppResult<bool> {
        Ok(self.state.write().await.team_roles.remove(&binding))
    }

    async fn list_team_roles(&self, team_id: TeamId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;

        Ok(state.roles_sorted(
            state
                .team_roles
                .iter()
                .filter(|binding| binding.team_id == team_id)
                .map(|binding| binding.role_id),
        ))
    }

    async fn insert_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;

        if !state.memberships.contains_key(&(team_id, user_id)) {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' is not a member of team '{team_id}'"
            )));
        }
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let key = (team_id, user_id, role_id);
        if state.member_roles.contains_key(&key) {
            return Ok(false);
        }

        state.member_roles.insert(key, Utc::now());
        Ok(true)
    }

    async fn delete_member_role(
        &self,
        team_id: TeamId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .member_roles
            .remove(&(team_id, user_id, role_id))
            .is_some())
    }

    async fn list_member_roles(&self, team_id: TeamId, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;

        Ok(state.roles_sorted(
            state
                .member_roles
                .keys()
                .filter(|(stored_team, stored_user, _)| {
                    *stored_team == team_id && *stored_user == user_id
                })
                .map(|(_, _, role_id)| *role_id),
        ))
    }
}
