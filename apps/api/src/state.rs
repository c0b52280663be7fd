use shopgate_application::{AuthorizationService, SecurityAdminService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
}
