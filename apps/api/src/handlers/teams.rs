use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use shopgate_application::{CreateTeamInput, Principal};
use shopgate_core::{TeamId, UserId};
use tracing::info;

use crate::dto::{
    AddMemberRequest, BulkRemoveResponse, BulkRoleAddResponse, BulkRoleIdsRequest,
    CreateTeamRequest, CreatedResponse, RemovedResponse, RoleResponse, TeamMemberResponse,
    TeamResponse, UpdateTeamRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_teams_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let teams = state
        .security_admin_service
        .list_teams(&principal)
        .await?
        .into_iter()
        .map(TeamResponse::from)
        .collect();

    Ok(Json(teams))
}

pub async fn create_team_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let team = state
        .security_admin_service
        .create_team(
            &principal,
            CreateTeamInput {
                name: payload.name,
                display_name: payload.display_name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

pub async fn update_team_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
    Json(payload): Json<UpdateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let team = state
        .security_admin_service
        .update_team(&principal, team_id, payload.into())
        .await?;

    Ok(Json(TeamResponse::from(team)))
}

pub async fn delete_team_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
) -> ApiResult<StatusCode> {
    let team_id = TeamId::parse(team_id.as_str())?;
    state
        .security_admin_service
        .delete_team(&principal, team_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<TeamMemberResponse>>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let members = state
        .security_admin_service
        .list_members(&principal, team_id)
        .await?
        .into_iter()
        .map(TeamMemberResponse::from)
        .collect();

    Ok(Json(members))
}

pub async fn add_member_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
    Json(payload): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let user_id = UserId::parse(payload.user_id.as_str())?;

    let created = state
        .security_admin_service
        .add_member(&principal, team_id, user_id)
        .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(CreatedResponse { created })))
}

pub async fn remove_member_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((team_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<RemovedResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let user_id = UserId::parse(user_id.as_str())?;

    let removed = state
        .security_admin_service
        .remove_member(&principal, team_id, user_id)
        .await?;

    Ok(Json(RemovedResponse { removed }))
}

pub async fn list_team_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let roles = state
        .security_admin_service
        .team_roles(&principal, team_id)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn add_team_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
    Json(payload): Json<BulkRoleIdsRequest>,
) -> ApiResult<Json<BulkRoleAddResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let result = state
        .security_admin_service
        .add_team_roles(&principal, team_id, payload.role_ids)
        .await?;

    info!(
        %team_id,
        created = result.created_count,
        unchanged = result.unchanged_count,
        failed = result.failures.len(),
        "applied bulk team roles"
    );

    Ok(Json(BulkRoleAddResponse::from(result)))
}

pub async fn remove_team_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<String>,
    Json(payload): Json<BulkRoleIdsRequest>,
) -> ApiResult<Json<BulkRemoveResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let result = state
        .security_admin_service
        .remove_team_roles(&principal, team_id, payload.role_ids)
        .await?;

    info!(
        %team_id,
        removed = result.removed_count,
        skipped = result.skipped_count,
        failed = result.failures.len(),
        "applied bulk team role removal"
    );

    Ok(Json(BulkRemoveResponse::from(result)))
}

pub async fn list_member_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((team_id, user_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let user_id = UserId::parse(user_id.as_str())?;
    let roles = state
        .security_admin_service
        .member_roles(&principal, team_id, user_id)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn add_member_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((team_id, user_id)): Path<(String, String)>,
    Json(payload): Json<BulkRoleIdsRequest>,
) -> ApiResult<Json<BulkRoleAddResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let user_id = UserId::parse(user_id.as_str())?;
    let result = state
        .security_admin_service
        .add_member_roles(&principal, team_id, user_id, payload.role_ids)
        .await?;

    info!(
        %team_id,
        %user_id,
        created = result.created_count,
        unchanged = result.unchanged_count,
        failed = result.failures.len(),
        "applied bulk member roles"
    );

    Ok(Json(BulkRoleAddResponse::from(result)))
}

pub async fn remove_member_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((team_id, user_id)): Path<(String, String)>,
    Json(payload): Json<BulkRoleIdsRequest>,
) -> ApiResult<Json<BulkRemoveResponse>> {
    let team_id = TeamId::parse(team_id.as_str())?;
    let user_id = UserId::parse(user_id.as_str())?;
    let result = state
        .security_admin_service
        .remove_member_roles(&principal, team_id, user_id, payload.role_ids)
        .await?;

    info!(
        %team_id,
        %user_id,
        removed = result.removed_count,
        skipped = result.skipped_count,
        failed = result.failures.len(),
        "applied bulk member role removal"
    );

    Ok(Json(BulkRemoveResponse::from(result)))
}
