use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use shopgate_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/me/ability", get(handlers::ability::me_ability_handler))
        .route(
            "/api/me/ability/check",
            post(handlers::ability::check_ability_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::catalog::list_permissions_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            delete(handlers::catalog::delete_permission_handler),
        )
        .route(
            "/api/resources",
            get(handlers::catalog::list_resources_handler)
                .post(handlers::catalog::create_resource_handler),
        )
        .route(
            "/api/resources/{resource_id}",
            put(handlers::catalog::update_resource_handler)
                .delete(handlers::catalog::delete_resource_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .put(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/grants",
            get(handlers::roles::list_role_grants_handler)
                .post(handlers::roles::grant_handler)
                .delete(handlers::roles::revoke_handler),
        )
        .route(
            "/api/roles/{role_id}/grants/bulk",
            post(handlers::roles::bulk_add_grants_handler),
        )
        .route(
            "/api/roles/{role_id}/grants/bulk-remove",
            post(handlers::roles::bulk_remove_grants_handler),
        )
        .route(
            "/api/teams",
            get(handlers::teams::list_teams_handler).post(handlers::teams::create_team_handler),
        )
        .route(
            "/api/teams/{team_id}",
            put(handlers::teams::update_team_handler)
                .delete(handlers::teams::delete_team_handler),
        )
        .route(
            "/api/teams/{team_id}/members",
            get(handlers::teams::list_members_handler).post(handlers::teams::add_member_handler),
        )
        .route(
            "/api/teams/{team_id}/members/{user_id}",
            delete(handlers::teams::remove_member_handler),
        )
        .route(
            "/api/teams/{team_id}/roles",
            get(handlers::teams::list_team_roles_handler)
                .post(handlers::teams::add_team_roles_handler),
        )
        .route(
            "/api/teams/{team_id}/roles/bulk-remove",
            post(handlers::teams::remove_team_roles_handler),
        )
        .route(
            "/api/teams/{team_id}/members/{user_id}/roles",
            get(handlers::teams::list_member_roles_handler)
                .post(handlers::teams::add_member_roles_handler),
        )
        .route(
            "/api/teams/{team_id}/members/{user_id}/roles/bulk-remove",
            post(handlers::teams::remove_member_roles_handler),
        )
        .route(
            "/api/users/{user_id}/effective-roles",
            get(handlers::users::effective_roles_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_principal,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
