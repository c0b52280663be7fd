use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shopgate_core::{AppError, PermissionId, ResourceId, RoleId};

use crate::catalog::{Action, IdentifierName};

/// Grant Matrix row keyed by identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role receiving the grant.
    pub role_id: RoleId,
    /// Granted resource.
    pub resource_id: ResourceId,
    /// Granted permission verb.
    pub permission_id: PermissionId,
}

/// Resolved `resource:action` pair in wire format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionString {
    resource: IdentifierName,
    action: Action,
}

impl PermissionString {
    /// Creates a permission string from its typed parts.
    #[must_use]
    pub fn new(resource: IdentifierName, action: Action) -> Self {
        Self { resource, action }
    }

    /// Returns the resource name.
    #[must_use]
    pub fn resource(&self) -> &IdentifierName {
        &self.resource
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Parses a transport value into a permission string.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for PermissionString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for PermissionString {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((resource, action)) = value.split_once(':') else {
            return Err(AppError::Validation(format!(
                "permission string '{value}' must use the 'resource:action' format"
            )));
        };

        if resource != resource.trim() {
            return Err(AppError::Validation(format!(
                "permission string '{value}' must not contain whitespace"
            )));
        }

        Ok(Self {
            resource: IdentifierName::new(resource)?,
            action: Action::from_str(action)?,
        })
    }
}

impl TryFrom<String> for PermissionString {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<PermissionString> for String {
    fn from(value: PermissionString) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::PermissionString;
    use crate::Action;

    #[test]
    fn permission_string_parses_wire_format() {
        let parsed = PermissionString::from_str("product:manage");
        assert!(parsed.is_ok());
        let Ok(parsed) = parsed else {
            return;
        };
        assert_eq!(parsed.resource().as_str(), "product");
        assert_eq!(parsed.action(), Action::Manage);
        assert_eq!(parsed.to_string(), "product:manage");
    }

    #[test]
    fn permission_string_rejects_malformed_values() {
        assert!(PermissionString::from_str("product").is_err());
        assert!(PermissionString::from_str("product:").is_err());
        assert!(PermissionString::from_str(":view").is_err());
        assert!(PermissionString::from_str("Product:view").is_err());
        assert!(PermissionString::from_str("product:View").is_err());
        assert!(PermissionString::from_str("product:view:extra").is_err());
        assert!(PermissionString::from_str(" product:view").is_err());
    }

    #[test]
    fn permission_string_serializes_as_wire_value() {
        let parsed = PermissionString::from_str("order:view");
        let encoded = parsed
            .ok()
            .and_then(|value| serde_json::to_string(&value).ok())
            .unwrap_or_default();
        assert_eq!(encoded, "\"order:view\"");
    }
}
