//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_ports;
mod authorization_service;
mod bulk;
mod guard;
mod security_admin_ports;
mod security_admin_service;

pub use authorization_ports::{AuthorizationRepository, PrincipalSnapshot, ResolvedRoleGrant};
pub use authorization_service::{AuthorizationService, EffectiveAccess};
pub use bulk::{
    BulkAddResult, BulkItemFailure, BulkItemOutcome, BulkOutcome, BulkRemoveResult, apply_each,
    ensure_non_empty,
};
pub use guard::{Principal, Requirement, RequirementSet, RouteGuard, UiGuard};
pub use security_admin_ports::{
    AuditEvent, AuditRepository, CatalogRepository, CreateResourceInput, CreateRoleInput,
    CreateTeamInput, GrantMatrixRepository, GrantResult, RevokeResult, RoleRepository,
    TeamRepository,
};
pub use security_admin_service::{BootstrapReport, SecurityAdminService};
