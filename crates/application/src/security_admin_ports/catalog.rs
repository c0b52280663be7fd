/// Input payload for adding a resource to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResourceInput {
    /// Unique resource name used in permission strings.
    pub name: String,
    /// Human-readable label.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
}
