use serde::{Deserialize, Serialize};
use shopgate_application::Principal;
use ts_rs::TS;

/// Ability of the calling principal, enough for a client to rebuild its evaluator.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ability-response.ts"
)]
pub struct AbilityResponse {
    pub user_id: String,
    pub display_name: String,
    pub role_name: String,
    pub super_admin: bool,
    pub permissions: Vec<String>,
}

/// One `(action, subject)` pair to evaluate.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/requirement-request.ts"
)]
pub struct RequirementRequest {
    pub action: String,
    pub subject: String,
}

/// Incoming payload for an ability check. `requireAll` defaults to true.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ability-check-request.ts"
)]
pub struct AbilityCheckRequest {
    pub requirements: Vec<RequirementRequest>,
    pub require_all: Option<bool>,
}

/// Result of an ability check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/ability-check-response.ts"
)]
pub struct AbilityCheckResponse {
    pub allowed: bool,
}

impl From<&Principal> for AbilityResponse {
    fn from(value: &Principal) -> Self {
        let snapshot = value.ability().snapshot();

        Self {
            user_id: value.identity().user_id().to_string(),
            display_name: value.identity().display_name().to_owned(),
            role_name: value.identity().direct_role_name().to_owned(),
            super_admin: snapshot.super_admin,
            permissions: snapshot
                .permissions
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
