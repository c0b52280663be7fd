use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use shopgate_core::{AppError, UserId, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Resolves the upstream identity headers into a principal carried by the request.
pub async fn require_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;

    let principal = state
        .authorization_service
        .principal(identity)
        .await
        .map_err(|error| match error {
            AppError::NotFound(message) => AppError::Unauthorized(message),
            other => other,
        })?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let user_id = header_value(headers, USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let user_id = UserId::parse(user_id)
        .map_err(|_| AppError::Unauthorized(format!("invalid {USER_ID_HEADER} header")))?;

    let role_name = header_value(headers, USER_ROLE_HEADER)
        .ok_or_else(|| AppError::Unauthorized(format!("{USER_ROLE_HEADER} header is required")))?;

    let display_name = header_value(headers, USER_NAME_HEADER)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| user_id.to_string());

    Ok(UserIdentity::new(user_id, display_name, role_name))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
