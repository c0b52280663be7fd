use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopgate_core::{AppResult, NonEmptyString, RoleId, TeamId, UserId};

use crate::catalog::{IdentifierName, normalize_description};

/// Named grouping of users sharing baseline roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: IdentifierName,
    display_name: NonEmptyString,
    description: Option<String>,
    is_active: bool,
    created_by: Option<UserId>,
}

/// Mutable attributes of a team.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamChanges {
    /// New display name.
    pub display_name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New activation state.
    pub is_active: Option<bool>,
}

impl Team {
    /// Creates a validated team.
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
        created_by: Option<UserId>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: IdentifierName::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            description: normalize_description(description),
            is_active,
            created_by,
        })
    }

    /// Returns the stable team identifier.
    #[must_use]
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the unique team name.
    #[must_use]
    pub fn name(&self) -> &IdentifierName {
        &self.name
    }

    /// Returns the team display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns an optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the team is shown as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creator, when the team was created by a user.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Applies mutable attribute changes.
    pub fn apply_changes(&mut self, changes: TeamChanges) -> AppResult<()> {
        let display_name = changes
            .display_name
            .map(NonEmptyString::new)
            .transpose()?;

        if let Some(display_name) = display_name {
            self.display_name = display_name;
        }
        if let Some(description) = changes.description {
            self.description = normalize_description(description);
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }

        Ok(())
    }
}

/// A user's membership in a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    /// Member user.
    pub user_id: UserId,
    /// Team joined.
    pub team_id: TeamId,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// Baseline role applied to every member of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRoleBinding {
    /// Team carrying the role.
    pub team_id: TeamId,
    /// Role applied to members.
    pub role_id: RoleId,
}

/// Additional role granted to one member within one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberTeamRole {
    /// Member user.
    pub user_id: UserId,
    /// Team scope of the grant.
    pub team_id: TeamId,
    /// Role granted.
    pub role_id: RoleId,
    /// When the role was granted.
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use shopgate_core::TeamId;

    use super::{Team, TeamChanges};

    #[test]
    fn team_requires_identifier_name() {
        let team = Team::new(TeamId::new(), "Sales Team", "Sales", None, true, None);
        assert!(team.is_err());
    }

    #[test]
    fn team_changes_reject_blank_display_name_without_partial_update() {
        let team = Team::new(TeamId::new(), "sales", "Sales", None, true, None);
        let Ok(mut team) = team else {
            panic!("team should be valid");
        };

        let result = team.apply_changes(TeamChanges {
            display_name: Some("  ".to_owned()),
            is_active: Some(false),
            ..TeamChanges::default()
        });

        assert!(result.is_err());
        assert!(team.is_active());
        assert_eq!(team.display_name().as_str(), "Sales");
    }
}
