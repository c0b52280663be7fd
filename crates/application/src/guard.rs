use shopgate_core::{AppError, AppResult, UserIdentity};
use shopgate_domain::{Ability, Action};

/// Authenticated caller together with its evaluated ability.
///
/// Built once per request and passed explicitly to every guarded operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    identity: UserIdentity,
    ability: Ability,
}

impl Principal {
    /// Creates a principal from an identity and its precomputed ability.
    #[must_use]
    pub fn new(identity: UserIdentity, ability: Ability) -> Self {
        Self { identity, ability }
    }

    /// Returns the caller identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the caller ability.
    #[must_use]
    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    /// Shorthand for a single-requirement route guard.
    pub fn require(&self, action: Action, subject: &str) -> AppResult<()> {
        RouteGuard::authorize(&self.ability, &RequirementSet::single(action, subject))
    }
}

/// One `(action, subject)` pair a guard checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Requested action.
    pub action: Action,
    /// Requested subject.
    pub subject: String,
}

impl Requirement {
    /// Creates a requirement.
    #[must_use]
    pub fn new(action: Action, subject: impl Into<String>) -> Self {
        Self {
            action,
            subject: subject.into(),
        }
    }
}

/// Requirements combined with AND (`require_all`) or OR.
///
/// An empty set is never satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementSet {
    requirements: Vec<Requirement>,
    require_all: bool,
}

impl RequirementSet {
    /// Creates a requirement set.
    #[must_use]
    pub fn new(requirements: Vec<Requirement>, require_all: bool) -> Self {
        Self {
            requirements,
            require_all,
        }
    }

    /// Creates a set holding one requirement.
    #[must_use]
    pub fn single(action: Action, subject: impl Into<String>) -> Self {
        Self::new(vec![Requirement::new(action, subject)], true)
    }

    /// Creates a set satisfied only when every requirement holds.
    #[must_use]
    pub fn all_of(requirements: Vec<Requirement>) -> Self {
        Self::new(requirements, true)
    }

    /// Creates a set satisfied when at least one requirement holds.
    #[must_use]
    pub fn any_of(requirements: Vec<Requirement>) -> Self {
        Self::new(requirements, false)
    }

    /// Returns the requirements.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns whether every requirement must hold.
    #[must_use]
    pub fn require_all(&self) -> bool {
        self.require_all
    }

    /// Evaluates the set against an ability.
    #[must_use]
    pub fn is_satisfied_by(&self, ability: &Ability) -> bool {
        if self.requirements.is_empty() {
            return false;
        }

        let mut checks = self
            .requirements
            .iter()
            .map(|requirement| ability.can(requirement.action, requirement.subject.as_str()));

        if self.require_all {
            checks.all(|allowed| allowed)
        } else {
            checks.any(|allowed| allowed)
        }
    }

    fn describe(&self) -> String {
        let joined = self
            .requirements
            .iter()
            .map(|requirement| format!("{}:{}", requirement.subject, requirement.action))
            .collect::<Vec<_>>()
            .join(if self.require_all { " and " } else { " or " });

        if joined.is_empty() {
            "an empty requirement set".to_owned()
        } else {
            joined
        }
    }
}

/// Route and endpoint enforcement point.
///
/// Evaluated before the guarded operation runs, so a denial never leaves side
/// effects behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Rejects with [`AppError::Forbidden`] unless the requirements are satisfied.
    ///
    /// The error message names the missing requirement for logs only.
    pub fn authorize(ability: &Ability, requirements: &RequirementSet) -> AppResult<()> {
        if requirements.is_satisfied_by(ability) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "ability does not satisfy {}",
            requirements.describe()
        )))
    }
}

/// Declarative UI enforcement point.
///
/// Absence of a capability is a normal state here: content falls back silently.
#[derive(Debug, Clone, Copy)]
pub struct UiGuard<'a> {
    ability: &'a Ability,
}

impl<'a> UiGuard<'a> {
    /// Creates a UI guard over a principal's ability.
    #[must_use]
    pub fn new(ability: &'a Ability) -> Self {
        Self { ability }
    }

    /// Returns whether guarded content would be shown.
    #[must_use]
    pub fn allows(&self, requirements: &RequirementSet) -> bool {
        requirements.is_satisfied_by(self.ability)
    }

    /// Renders `content` when allowed, otherwise `fallback`.
    pub fn render<T>(
        &self,
        requirements: &RequirementSet,
        content: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.allows(requirements) {
            content()
        } else {
            fallback()
        }
    }

    /// Renders `content` when allowed, otherwise the empty default.
    pub fn render_or_default<T: Default>(
        &self,
        requirements: &RequirementSet,
        content: impl FnOnce() -> T,
    ) -> T {
        self.render(requirements, content, T::default)
    }
}
