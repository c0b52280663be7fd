use serde::{Deserialize, Serialize};
use shopgate_application::BulkAddResult;
use shopgate_domain::{Role, Team, TeamChanges, TeamMembership};
use ts_rs::TS;

use super::common::BulkFailureResponse;
use super::roles::RoleResponse;

/// API representation of a team.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/team-response.ts"
)]
pub struct TeamResponse {
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<String>,
}

/// Incoming payload for team creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-team-request.ts"
)]
pub struct CreateTeamRequest {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// Incoming payload for team updates. An empty description clears it.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-team-request.ts"
)]
pub struct UpdateTeamRequest {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Incoming payload for adding a team member.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/add-member-request.ts"
)]
pub struct AddMemberRequest {
    pub user_id: String,
}

/// API representation of a team membership.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/team-member-response.ts"
)]
pub struct TeamMemberResponse {
    pub team_id: String,
    pub user_id: String,
    pub joined_at: String,
}

/// Incoming payload for bulk team or member role changes, keyed by role id.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-role-ids-request.ts"
)]
pub struct BulkRoleIdsRequest {
    pub role_ids: Vec<String>,
}

/// Outcome of a bulk role assignment, with the full resulting role set.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-role-add-response.ts"
)]
pub struct BulkRoleAddResponse {
    pub roles: Vec<RoleResponse>,
    pub created_count: usize,
    pub unchanged_count: usize,
    pub failures: Vec<BulkFailureResponse>,
}

impl From<Team> for TeamResponse {
    fn from(value: Team) -> Self {
        Self {
            team_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            display_name: value.display_name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            is_active: value.is_active(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
        }
    }
}

impl From<UpdateTeamRequest> for TeamChanges {
    fn from(value: UpdateTeamRequest) -> Self {
        Self {
            display_name: value.display_name,
            description: value.description.map(Some),
            is_active: value.is_active,
        }
    }
}

impl From<TeamMembership> for TeamMemberResponse {
    fn from(value: TeamMembership) -> Self {
        Self {
            team_id: value.team_id.to_string(),
            user_id: value.user_id.to_string(),
            joined_at: value.joined_at.to_rfc3339(),
        }
    }
}

impl From<BulkAddResult<Role>> for BulkRoleAddResponse {
    fn from(value: BulkAddResult<Role>) -> Self {
        Self {
            roles: value
                .associations
                .into_iter()
                .map(RoleResponse::from)
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
