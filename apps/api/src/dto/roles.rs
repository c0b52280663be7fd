use serde::{Deserialize, Serialize};
use shopgate_application::{BulkAddResult, EffectiveAccess};
use shopgate_core::UserId;
use shopgate_domain::{PermissionString, Role, RoleChanges};
use ts_rs::TS;

use super::common::BulkFailureResponse;

/// API representation of an RBAC role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_system: bool,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub created_by: Option<String>,
}

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// Incoming payload for role updates. An empty description clears it.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Incoming payload for a single grant or revoke.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/grant-request.ts"
)]
pub struct GrantRequest {
    pub resource_id: String,
    pub permission_id: String,
}

/// Incoming payload for bulk grant changes, keyed by `resource:action`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-permissions-request.ts"
)]
pub struct BulkPermissionsRequest {
    pub permissions: Vec<String>,
}

/// Outcome of a bulk grant, with the role's full resulting grant set.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-grant-add-response.ts"
)]
pub struct BulkGrantAddResponse {
    pub permissions: Vec<String>,
    pub created_count: usize,
    pub unchanged_count: usize,
    pub failures: Vec<BulkFailureResponse>,
}

/// Query of the effective-roles lookup.
#[derive(Debug, Deserialize)]
pub struct EffectiveRolesQuery {
    pub role: String,
}

/// Effective roles and permissions of one user.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/effective-roles-response.ts"
)]
pub struct EffectiveRolesResponse {
    pub user_id: String,
    pub roles: Vec<RoleResponse>,
    pub permissions: Vec<String>,
    pub super_admin: bool,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            display_name: value.display_name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            is_system: value.is_system(),
            is_super_admin: value.is_super_admin(),
            is_active: value.is_active(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
        }
    }
}

impl From<UpdateRoleRequest> for RoleChanges {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            display_name: value.display_name,
            description: value.description.map(Some),
            is_active: value.is_active,
        }
    }
}

impl From<BulkAddResult<PermissionString>> for BulkGrantAddResponse {
    fn from(value: BulkAddResult<PermissionString>) -> Self {
        Self {
            permissions: value
                .associations
                .iter()
                .map(ToString::to_string)
                .collect(),
            created_count: value.created_count,
            unchanged_count: value.unchanged_count,
            failures: value
                .failures
                .into_iter()
                .map(BulkFailureResponse::from)
                .collect(),
        }
    }
}

impl EffectiveRolesResponse {
    pub fn from_access(user_id: UserId, access: EffectiveAccess) -> Self {
        Self {
            user_id: user_id.to_string(),
            roles: access.roles.into_iter().map(RoleResponse::from).collect(),
            permissions: access.permissions.iter().map(ToString::to_string).collect(),
            super_admin: access.is_super_admin,
        }
    }
}
