/// Input payload for creating teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTeamInput {
    /// Unique team name.
    pub name: String,
    /// Human-readable label.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
}
