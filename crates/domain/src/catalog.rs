use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shopgate_core::{AppError, AppResult, NonEmptyString, PermissionId, ResourceId};

/// Maximum length of a catalog, role or team name.
pub const NAME_MAX_LENGTH: usize = 64;

/// Resource guarding role administration.
pub const ROLE_SUBJECT: &str = "role";
/// Resource guarding resource catalog administration.
pub const RESOURCE_SUBJECT: &str = "resource";
/// Resource guarding permission catalog reads.
pub const PERMISSION_SUBJECT: &str = "permission";
/// Resource guarding team administration.
pub const TEAM_SUBJECT: &str = "team";

/// Wildcard resource name matching every subject.
pub const WILDCARD_SUBJECT: &str = "all";

/// Resources the engine needs for guarding its own administration.
#[must_use]
pub fn reserved_subjects() -> &'static [&'static str] {
    &[ROLE_SUBJECT, RESOURCE_SUBJECT, PERMISSION_SUBJECT, TEAM_SUBJECT]
}

/// Atomic verb a grant can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read access.
    View,
    /// Create access.
    Create,
    /// Update access.
    Edit,
    /// Delete access.
    Delete,
    /// Shorthand for view, create, edit and delete.
    Manage,
    /// Matches every action on the granted resource.
    All,
}

impl Action {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Manage => "manage",
            Self::All => "all",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[
            Action::View,
            Action::Create,
            Action::Edit,
            Action::Delete,
            Action::Manage,
            Action::All,
        ];

        ALL
    }

    /// Returns the concrete actions implied by `manage`.
    #[must_use]
    pub fn managed() -> &'static [Self] {
        &[Action::View, Action::Create, Action::Edit, Action::Delete]
    }

    /// Returns the human-readable label used when seeding the catalog.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::View => "View",
            Self::Create => "Create",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Manage => "Manage",
            Self::All => "All",
        }
    }

    /// Parses a transport value into an action.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            "manage" => Ok(Self::Manage),
            "all" => Ok(Self::All),
            _ => Err(AppError::Validation(format!(
                "unknown action value '{value}'"
            ))),
        }
    }
}

/// Lowercase identifier used for resource, role and team names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentifierName(String);

impl IdentifierName {
    /// Creates a validated identifier name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        if trimmed.len() > NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "name '{trimmed}' exceeds {NAME_MAX_LENGTH} characters"
            )));
        }

        let mut characters = trimmed.chars();
        let starts_with_letter = characters
            .next()
            .map(|first| first.is_ascii_lowercase())
            .unwrap_or(false);
        let rest_is_valid = characters.all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
        });

        if !starts_with_letter || !rest_is_valid {
            return Err(AppError::Validation(format!(
                "name '{trimmed}' must start with a lowercase letter and contain only lowercase letters, digits or '_'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for IdentifierName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentifierName> for String {
    fn from(value: IdentifierName) -> Self {
        value.0
    }
}

impl Display for IdentifierName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Permission verb stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    id: PermissionId,
    action: Action,
    display_name: NonEmptyString,
    description: Option<String>,
}

impl PermissionDefinition {
    /// Creates a validated permission definition.
    pub fn new(
        id: PermissionId,
        action: Action,
        display_name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            action,
            display_name: NonEmptyString::new(display_name)?,
            description: normalize_description(description),
        })
    }

    /// Returns the stable permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the verb this permission carries.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the permission display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns an optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Mutable attributes of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceChanges {
    /// New display name.
    pub display_name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New activation state.
    pub is_active: Option<bool>,
}

/// Protected subject a grant can target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    id: ResourceId,
    name: IdentifierName,
    display_name: NonEmptyString,
    description: Option<String>,
    is_active: bool,
}

impl ResourceDefinition {
    /// Creates a validated resource definition.
    pub fn new(
        id: ResourceId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: IdentifierName::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            description: normalize_description(description),
            is_active,
        })
    }

    /// Returns the stable resource identifier.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the unique resource name used in permission strings.
    #[must_use]
    pub fn name(&self) -> &IdentifierName {
        &self.name
    }

    /// Returns the resource display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns an optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the resource is shown as active.
    ///
    /// Inactive resources keep their grants.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Applies mutable attribute changes. The name is fixed at creation.
    pub fn apply_changes(&mut self, changes: ResourceChanges) -> AppResult<()> {
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

pub(crate) fn normalize_description(description: Option<String>) -> Option<String> {
    description.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}
