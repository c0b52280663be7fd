use serde::{Deserialize, Serialize};
use shopgate_core::{AppError, AppResult, NonEmptyString, RoleId, UserId};

use crate::catalog::{IdentifierName, normalize_description};

/// Name of the system role seeded with the super-admin capability.
pub const SUPER_ADMIN_ROLE_NAME: &str = "super_admin";

/// Named bundle of grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: IdentifierName,
    display_name: NonEmptyString,
    description: Option<String>,
    is_system: bool,
    is_super_admin: bool,
    is_active: bool,
    created_by: Option<UserId>,
}

/// Flags describing how a role participates in evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
    /// Protects the role from deletion.
    pub is_system: bool,
    /// Satisfies every ability check regardless of grants.
    pub is_super_admin: bool,
    /// Inactive roles grant nothing.
    pub is_active: bool,
}

impl RoleFlags {
    /// Flags of an ordinary, active custom role.
    #[must_use]
    pub fn custom() -> Self {
        Self {
            is_system: false,
            is_super_admin: false,
            is_active: true,
        }
    }

    /// Flags of the seeded super-admin role.
    #[must_use]
    pub fn super_admin() -> Self {
        Self {
            is_system: true,
            is_super_admin: true,
            is_active: true,
        }
    }
}

/// Mutable attributes of a role. The name is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleChanges {
    /// New display name.
    pub display_name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New activation state.
    pub is_active: Option<bool>,
}

impl Role {
    /// Creates a validated role.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: Option<String>,
        flags: RoleFlags,
        created_by: Option<UserId>,
    ) -> AppResult<Self> {
        if flags.is_super_admin && !flags.is_system {
            return Err(AppError::Validation(
                "a super-admin role must be a system role".to_owned(),
            ));
        }

        Ok(Self {
            id,
            name: IdentifierName::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            description: normalize_description(description),
            is_system: flags.is_system,
            is_super_admin: flags.is_super_admin,
            is_active: flags.is_active,
            created_by,
        })
    }

    /// Returns the stable role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the immutable role name.
    #[must_use]
    pub fn name(&self) -> &IdentifierName {
        &self.name
    }

    /// Returns the role display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns an optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the role is protected from deletion.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Returns whether the role bypasses grant evaluation.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    /// Returns whether the role currently grants anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creator, when the role was created by a user.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Applies mutable attribute changes.
    pub fn apply_changes(&mut self, changes: RoleChanges) -> AppResult<()> {
        if self.is_super_admin && changes.is_active == Some(false) {
            return Err(AppError::Validation(format!(
                "role '{}' is a super-admin role and cannot be deactivated",
                self.name
            )));
        }

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

    /// Fails when the role is protected from deletion.
    pub fn ensure_deletable(&self) -> AppResult<()> {
        if self.is_system {
            return Err(AppError::Validation(format!(
                "role '{}' is a system role and cannot be deleted",
                self.name
            )));
        }

        Ok(())
    }
}
