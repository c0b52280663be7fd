use serde::{Deserialize, Serialize};
use shopgate_domain::{PermissionDefinition, ResourceChanges, ResourceDefinition};
use ts_rs::TS;

/// API representation of a catalog permission.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub action: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// API representation of a protected resource.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resource-response.ts"
)]
pub struct ResourceResponse {
    pub resource_id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Incoming payload for resource creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-resource-request.ts"
)]
pub struct CreateResourceRequest {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// Incoming payload for resource updates. An empty description clears it.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-resource-request.ts"
)]
pub struct UpdateResourceRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl From<PermissionDefinition> for PermissionResponse {
    fn from(value: PermissionDefinition) -> Self {
        Self {
            permission_id: value.id().to_string(),
            action: value.action().as_str().to_owned(),
            display_name: value.display_name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
        }
    }
}

impl From<ResourceDefinition> for ResourceResponse {
    fn from(value: ResourceDefinition) -> Self {
        Self {
            resource_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            display_name: value.display_name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            is_active: value.is_active(),
        }
    }
}

impl From<UpdateResourceRequest> for ResourceChanges {
    fn from(value: UpdateResourceRequest) -> Self {
        Self {
            display_name: value.display_name,
            description: value.description.map(Some),
            is_active: value.is_active,
        }
    }
}
