use serde::{Deserialize, Serialize};

use crate::UserId;

/// Resolved caller identity handed over by the authentication layer.
///
/// The engine never authenticates; it only authorizes the pair of user id and
/// direct role name carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    display_name: String,
    direct_role_name: String,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        direct_role_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            direct_role_name: direct_role_name.into(),
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the name of the role assigned directly to the user.
    #[must_use]
    pub fn direct_role_name(&self) -> &str {
        self.direct_role_name.as_str()
    }
}
