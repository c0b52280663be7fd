use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use shopgate_application::{CreateResourceInput, Principal};
use shopgate_core::{PermissionId, ResourceId};

use crate::dto::{
    CreateResourceRequest, PermissionResponse, ResourceResponse, UpdateResourceRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&principal)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    let permission_id = PermissionId::parse(permission_id.as_str())?;
    state
        .security_admin_service
        .delete_permission(&principal, permission_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_resources_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<ResourceResponse>>> {
    let resources = state
        .security_admin_service
        .list_resources(&principal)
        .await?
        .into_iter()
        .map(ResourceResponse::from)
        .collect();

    Ok(Json(resources))
}

pub async fn create_resource_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateResourceRequest>,
) -> ApiResult<(StatusCode, Json<ResourceResponse>)> {
    let resource = state
        .security_admin_service
        .create_resource(
            &principal,
            CreateResourceInput {
                name: payload.name,
                display_name: payload.display_name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ResourceResponse::from(resource))))
}

pub async fn update_resource_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(resource_id): Path<String>,
    Json(payload): Json<UpdateResourceRequest>,
) -> ApiResult<Json<ResourceResponse>> {
    let resource_id = ResourceId::parse(resource_id.as_str())?;
    let resource = state
        .security_admin_service
        .update_resource(&principal, resource_id, payload.into())
        .await?;

    Ok(Json(ResourceResponse::from(resource)))
}

pub async fn delete_resource_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(resource_id): Path<String>,
) -> ApiResult<StatusCode> {
    let resource_id = ResourceId::parse(resource_id.as_str())?;
    state
        .security_admin_service
        .delete_resource(&principal, resource_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
