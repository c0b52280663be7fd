use axum::Json;
use axum::extract::Extension;
use shopgate_application::{Principal, Requirement, RequirementSet, UiGuard};
use shopgate_domain::Action;

use crate::dto::{AbilityCheckRequest, AbilityCheckResponse, AbilityResponse};
use crate::error::ApiResult;

pub async fn me_ability_handler(
    Extension(principal): Extension<Principal>,
) -> Json<AbilityResponse> {
    Json(AbilityResponse::from(&principal))
}

pub async fn check_ability_handler(
    Extension(principal): Extension<Principal>,
    Json(payload): Json<AbilityCheckRequest>,
) -> ApiResult<Json<AbilityCheckResponse>> {
    let requirements = payload
        .requirements
        .into_iter()
        .map(|requirement| {
            Action::from_transport(requirement.action.as_str())
                .map(|action| Requirement::new(action, requirement.subject))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let requirements = RequirementSet::new(requirements, payload.require_all.unwrap_or(true));

    Ok(Json(AbilityCheckResponse {
        allowed: UiGuard::new(principal.ability()).allows(&requirements),
    }))
}
