use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::{Action, WILDCARD_SUBJECT};
use crate::grant::PermissionString;

/// Set of actions registered for one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionMask(u8);

impl ActionMask {
    fn bit(action: Action) -> u8 {
        match action {
            Action::View => 1,
            Action::Create => 1 << 1,
            Action::Edit => 1 << 2,
            Action::Delete => 1 << 3,
            Action::Manage => 1 << 4,
            Action::All => 1 << 5,
        }
    }

    fn insert(&mut self, action: Action) {
        self.0 |= Self::bit(action);
    }

    fn allows(self, action: Action) -> bool {
        self.0 & (Self::bit(action) | Self::bit(Action::All)) != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AbilityRules {
    Unrestricted,
    DenyAll,
    Rules(HashMap<String, ActionMask>),
}

/// Evaluated capabilities of one principal.
///
/// Built once from the effective permission strings; checks are map lookups
/// over typed actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    rules: AbilityRules,
    permissions: BTreeSet<PermissionString>,
}

impl Ability {
    /// Builds an ability from the super-admin flag and effective permission strings.
    ///
    /// A super-admin ability allows everything and ignores the permissions. An
    /// empty permission set denies everything. `manage` registers view, create,
    /// edit and delete as well as `manage` itself.
    #[must_use]
    pub fn build(
        is_super_admin: bool,
        permissions: impl IntoIterator<Item = PermissionString>,
    ) -> Self {
        let permissions: BTreeSet<PermissionString> = permissions.into_iter().collect();

        if is_super_admin {
            return Self {
                rules: AbilityRules::Unrestricted,
                permissions,
            };
        }

        if permissions.is_empty() {
            return Self::deny_all();
        }

        let mut rules: HashMap<String, ActionMask> = HashMap::new();
        for permission in &permissions {
            let mask = rules
                .entry(permission.resource().as_str().to_owned())
                .or_default();

            if permission.action() == Action::Manage {
                for action in Action::managed() {
                    mask.insert(*action);
                }
            }
            mask.insert(permission.action());
        }

        Self {
            rules: AbilityRules::Rules(rules),
            permissions,
        }
    }

    /// Returns an ability that allows every check.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            rules: AbilityRules::Unrestricted,
            permissions: BTreeSet::new(),
        }
    }

    /// Returns an ability that denies every check.
    #[must_use]
    pub fn deny_all() -> Self {
        Self {
            rules: AbilityRules::DenyAll,
            permissions: BTreeSet::new(),
        }
    }

    /// Rebuilds an ability from its transport snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: AbilitySnapshot) -> Self {
        Self::build(snapshot.super_admin, snapshot.permissions)
    }

    /// Returns whether `action` is allowed on `subject`.
    ///
    /// Subjects match exactly and case-sensitively. Grants on the `all`
    /// resource and grants of the `all` action match as wildcards.
    #[must_use]
    pub fn can(&self, action: Action, subject: &str) -> bool {
        match &self.rules {
            AbilityRules::Unrestricted => true,
            AbilityRules::DenyAll => false,
            AbilityRules::Rules(rules) => [subject, WILDCARD_SUBJECT].iter().any(|resource| {
                rules
                    .get(*resource)
                    .map(|mask| mask.allows(action))
                    .unwrap_or(false)
            }),
        }
    }

    /// Logical negation of [`Ability::can`].
    #[must_use]
    pub fn cannot(&self, action: Action, subject: &str) -> bool {
        !self.can(action, subject)
    }

    /// Returns whether the ability bypasses grant evaluation.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.rules, AbilityRules::Unrestricted)
    }

    /// Returns the permission strings the ability was built from.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<PermissionString> {
        &self.permissions
    }

    /// Returns a transport snapshot a client can rebuild the same ability from.
    #[must_use]
    pub fn snapshot(&self) -> AbilitySnapshot {
        AbilitySnapshot {
            super_admin: self.is_unrestricted(),
            permissions: self.permissions.iter().cloned().collect(),
        }
    }
}

/// Serializable form of an [`Ability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySnapshot {
    /// Whether the principal holds a super-admin role.
    pub super_admin: bool,
    /// Effective permission strings, sorted.
    pub permissions: Vec<PermissionString>,
}
