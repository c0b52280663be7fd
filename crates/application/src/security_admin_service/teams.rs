use super::*;

use std::str::FromStr;

use shopgate_core::UserId;
use shopgate_domain::{Action, TEAM_SUBJECT, TeamChanges, TeamMembership, TeamRoleBinding};

use crate::bulk::{
    BulkAddResult, BulkItemOutcome, BulkRemoveResult, apply_each, ensure_non_empty,
};
use crate::security_admin_ports::CreateTeamInput;

impl SecurityAdminService {
    /// Lists all teams ordered by name.
    pub async fn list_teams(&self, principal: &Principal) -> AppResult<Vec<Team>> {
        principal.require(Action::View, TEAM_SUBJECT)?;
        self.team_repository.list_teams().await
    }

    /// Creates a team and emits an audit event.
    pub async fn create_team(
        &self,
        principal: &Principal,
        input: CreateTeamInput,
    ) -> AppResult<Team> {
        principal.require(Action::Create, TEAM_SUBJECT)?;

        let team = Team::new(
            TeamId::new(),
            input.name,
            input.display_name,
            input.description,
            true,
            Some(principal.identity().user_id()),
        )?;
        self.team_repository.create_team(team.clone()).await?;

        self.record(
            principal,
            AuditAction::TeamCreated,
            "rbac_team",
            team.id().to_string(),
            format!("created team '{}'", team.name()),
        )
        .await?;

        Ok(team)
    }

    /// Updates mutable team attributes and emits an audit event.
    pub async fn update_team(
        &self,
        principal: &Principal,
        team_id: TeamId,
        changes: TeamChanges,
    ) -> AppResult<Team> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;

        let mut team = self.load_team(team_id).await?;
        team.apply_changes(changes)?;
        self.team_repository.update_team(team.clone()).await?;

        self.record(
            principal,
            AuditAction::TeamUpdated,
            "rbac_team",
            team_id.to_string(),
            format!("updated team '{}'", team.name()),
        )
        .await?;

        Ok(team)
    }

    /// Deletes a team with its memberships and role associations.
    pub async fn delete_team(&self, principal: &Principal, team_id: TeamId) -> AppResult<()> {
        principal.require(Action::Delete, TEAM_SUBJECT)?;

        let team = self.load_team(team_id).await?;
        if !self.team_repository.delete_team(team_id).await? {
            return Err(AppError::NotFound(format!("team '{team_id}' does not exist")));
        }

        self.record(
            principal,
            AuditAction::TeamDeleted,
            "rbac_team",
            team_id.to_string(),
            format!("deleted team '{}'", team.name()),
        )
        .await
    }

    /// Adds a user to a team. Returns `false` when the user was already a member.
    pub async fn add_member(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
    ) -> AppResult<bool> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;

        let team = self.load_team(team_id).await?;
        let added = self.team_repository.add_member(team_id, user_id).await?;

        if added {
            self.record(
                principal,
                AuditAction::TeamMemberAdded,
                "rbac_team_member",
                format!("{team_id}:{user_id}"),
                format!("added user '{user_id}' to team '{}'", team.name()),
            )
            .await?;
        }

        Ok(added)
    }

    /// Removes a user and their per-member roles from a team.
    ///
    /// Returns `false` when the user was not a member.
    pub async fn remove_member(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
    ) -> AppResult<bool> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;

        let team = self.load_team(team_id).await?;
        let removed = self.team_repository.remove_member(team_id, user_id).await?;

        if removed {
            self.record(
                principal,
                AuditAction::TeamMemberRemoved,
                "rbac_team_member",
                format!("{team_id}:{user_id}"),
                format!("removed user '{user_id}' from team '{}'", team.name()),
            )
            .await?;
        }

        Ok(removed)
    }

    /// Lists memberships of a team.
    pub async fn list_members(
        &self,
        principal: &Principal,
        team_id: TeamId,
    ) -> AppResult<Vec<TeamMembership>> {
        principal.require(Action::View, TEAM_SUBJECT)?;

        self.load_team(team_id).await?;
        self.team_repository.list_members(team_id).await
    }

    /// Lists baseline roles of a team.
    pub async fn team_roles(&self, principal: &Principal, team_id: TeamId) -> AppResult<Vec<Role>> {
        principal.require(Action::View, TEAM_SUBJECT)?;

        self.load_team(team_id).await?;
        self.team_repository.list_team_roles(team_id).await
    }

    /// Attaches baseline roles, keyed by role id, to a team.
    pub async fn add_team_roles(
        &self,
        principal: &Principal,
        team_id: TeamId,
        role_ids: Vec<String>,
    ) -> AppResult<BulkAddResult<Role>> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;
        ensure_non_empty(&role_ids, "role id")?;

        let team = self.load_team(team_id).await?;
        let service = self;
        let outcome = apply_each(role_ids, move |key: String| async move {
            let role_id = RoleId::from_str(key.as_str())?;
            service.load_role(role_id).await?;

            let binding = TeamRoleBinding { team_id, role_id };
            if service.team_repository.insert_team_role(binding).await? {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::TeamRolesAdded,
                "rbac_team_role",
                team_id.to_string(),
                format!(
                    "attached roles [{}] to team '{}'",
                    outcome.succeeded.join(", "),
                    team.name()
                ),
            )
            .await;
        }

        let associations = self.team_repository.list_team_roles(team_id).await?;
        Ok(outcome.into_add_result(associations))
    }

    /// Detaches baseline roles, keyed by role id, from a team.
    pub async fn remove_team_roles(
        &self,
        principal: &Principal,
        team_id: TeamId,
        role_ids: Vec<String>,
    ) -> AppResult<BulkRemoveResult> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;
        ensure_non_empty(&role_ids, "role id")?;

        let team = self.load_team(team_id).await?;
        let service = self;
        let outcome = apply_each(role_ids, move |key: String| async move {
            let role_id = RoleId::from_str(key.as_str())?;

            let binding = TeamRoleBinding { team_id, role_id };
            if service.team_repository.delete_team_role(binding).await? {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::TeamRolesRemoved,
                "rbac_team_role",
                team_id.to_string(),
                format!(
                    "detached roles [{}] from team '{}'",
                    outcome.succeeded.join(", "),
                    team.name()
                ),
            )
            .await;
        }

        Ok(outcome.into_remove_result("roles"))
    }

    /// Lists roles granted to one member within a team.
    pub async fn member_roles(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
    ) -> AppResult<Vec<Role>> {
        principal.require(Action::View, TEAM_SUBJECT)?;

        self.load_membership(team_id, user_id).await?;
        self.team_repository
            .list_member_roles(team_id, user_id)
            .await
    }

    /// Grants roles, keyed by role id, to one member within a team.
    pub async fn add_member_roles(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
        role_ids: Vec<String>,
    ) -> AppResult<BulkAddResult<Role>> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;
        ensure_non_empty(&role_ids, "role id")?;

        let team = self.load_membership(team_id, user_id).await?;
        let service = self;
        let outcome = apply_each(role_ids, move |key: String| async move {
            let role_id = RoleId::from_str(key.as_str())?;
            service.load_role(role_id).await?;

            if service
                .team_repository
                .insert_member_role(team_id, user_id, role_id)
                .await?
            {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::MemberRolesAdded,
                "rbac_member_role",
                format!("{team_id}:{user_id}"),
                format!(
                    "granted roles [{}] to user '{user_id}' in team '{}'",
                    outcome.succeeded.join(", "),
                    team.name()
                ),
            )
            .await;
        }

        let associations = self
            .team_repository
            .list_member_roles(team_id, user_id)
            .await?;
        Ok(outcome.into_add_result(associations))
    }

    /// Removes roles, keyed by role id, from one member within a team.
    pub async fn remove_member_roles(
        &self,
        principal: &Principal,
        team_id: TeamId,
        user_id: UserId,
        role_ids: Vec<String>,
    ) -> AppResult<BulkRemoveResult> {
        principal.require(Action::Edit, TEAM_SUBJECT)?;
        ensure_non_empty(&role_ids, "role id")?;

        // Former members hold no member roles, so their keys count as skipped.
        let team = self.load_team(team_id).await?;
        let service = self;
        let outcome = apply_each(role_ids, move |key: String| async move {
            let role_id = RoleId::from_str(key.as_str())?;

            if service
                .team_repository
                .delete_member_role(team_id, user_id, role_id)
                .await?
            {
                Ok(BulkItemOutcome::Applied)
            } else {
                Ok(BulkItemOutcome::Skipped)
            }
        })
        .await;

        if !outcome.succeeded.is_empty() {
            self.record_bulk(
                principal,
                AuditAction::MemberRolesRemoved,
                "rbac_member_role",
                format!("{team_id}:{user_id}"),
                format!(
                    "removed roles [{}] from user '{user_id}' in team '{}'",
                    outcome.succeeded.join(", "),
                    team.name()
                ),
            )
            .await;
        }

        Ok(outcome.into_remove_result("roles"))
    }

    async fn load_membership(&self, team_id: TeamId, user_id: UserId) -> AppResult<Team> {
        let team = self.load_team(team_id).await?;
        if !self.team_repository.is_member(team_id, user_id).await? {
            return Err(AppError::NotFound(format!(
                "user '{user_id}' is not a member of team '{}'",
                team.name()
            )));
        }

        Ok(team)
    }
}
