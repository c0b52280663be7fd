use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use shopgate_application::{CreateRoleInput, Principal};
use shopgate_core::{PermissionId, ResourceId, RoleId};
use tracing::info;

use crate::dto::{
    BulkGrantAddResponse, BulkPermissionsRequest, BulkRemoveResponse, CreateRoleRequest,
    CreatedResponse, GrantRequest, RemovedResponse, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&principal)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(
            &principal,
            CreateRoleInput {
                name: payload.name,
                display_name: payload.display_name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let role = state
        .security_admin_service
        .get_role(&principal, role_id)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let role = state
        .security_admin_service
        .update_role(&principal, role_id, payload.into())
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::parse(role_id.as_str())?;
    state
        .security_admin_service
        .delete_role(&principal, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_grants_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let grants = state
        .security_admin_service
        .grants_for_role(&principal, role_id)
        .await?
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(Json(grants))
}

pub async fn grant_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<GrantRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let resource_id = ResourceId::parse(payload.resource_id.as_str())?;
    let permission_id = PermissionId::parse(payload.permission_id.as_str())?;

    let result = state
        .security_admin_service
        .grant(&principal, role_id, resource_id, permission_id)
        .await?;
    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(CreatedResponse {
            created: result.created,
        }),
    ))
}

pub async fn revoke_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<GrantRequest>,
) -> ApiResult<Json<RemovedResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let resource_id = ResourceId::parse(payload.resource_id.as_str())?;
    let permission_id = PermissionId::parse(payload.permission_id.as_str())?;

    let result = state
        .security_admin_service
        .revoke(&principal, role_id, resource_id, permission_id)
        .await?;

    Ok(Json(RemovedResponse {
        removed: result.removed,
    }))
}

pub async fn bulk_add_grants_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<BulkPermissionsRequest>,
) -> ApiResult<Json<BulkGrantAddResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let result = state
        .security_admin_service
        .add_role_grants(&principal, role_id, payload.permissions)
        .await?;

    info!(
        %role_id,
        created = result.created_count,
        unchanged = result.unchanged_count,
        failed = result.failures.len(),
        "applied bulk role grants"
    );

    Ok(Json(BulkGrantAddResponse::from(result)))
}

pub async fn bulk_remove_grants_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(role_id): Path<String>,
    Json(payload): Json<BulkPermissionsRequest>,
) -> ApiResult<Json<BulkRemoveResponse>> {
    let role_id = RoleId::parse(role_id.as_str())?;
    let result = state
        .security_admin_service
        .remove_role_grants(&principal, role_id, payload.permissions)
        .await?;

    info!(
        %role_id,
        removed = result.removed_count,
        skipped = result.skipped_count,
        failed = result.failures.len(),
        "applied bulk role grant removal"
    );

    Ok(Json(BulkRemoveResponse::from(result)))
}
