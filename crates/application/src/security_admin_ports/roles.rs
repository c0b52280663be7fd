/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique, immutable role name.
    pub name: String,
    /// Human-readable label.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Outcome of a single idempotent grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantResult {
    /// Whether a new Grant Matrix row was written.
    pub created: bool,
}

/// Outcome of a single idempotent revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevokeResult {
    /// Whether an existing Grant Matrix row was deleted.
    pub removed: bool,
}
