use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use shopgate_application::Principal;
use shopgate_core::{UserId, UserIdentity};
use shopgate_domain::{Action, ROLE_SUBJECT};

use crate::dto::{EffectiveRolesQuery, EffectiveRolesResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves another user's effective roles. The caller supplies the user's
/// direct role because identities live with the upstream authentication layer.
pub async fn effective_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Query(query): Query<EffectiveRolesQuery>,
) -> ApiResult<Json<EffectiveRolesResponse>> {
    principal.require(Action::View, ROLE_SUBJECT)?;

    let user_id = UserId::parse(user_id.as_str())?;
    let identity = UserIdentity::new(user_id, user_id.to_string(), query.role);
    let access = state
        .authorization_service
        .effective_access(&identity)
        .await?;

    Ok(Json(EffectiveRolesResponse::from_access(user_id, access)))
}
