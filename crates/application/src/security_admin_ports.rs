mod audit;
mod catalog;
mod repositories;
mod roles;
mod teams;

pub use audit::{AuditEvent, AuditRepository};
pub use catalog::CreateResourceInput;
pub use repositories::{
    CatalogRepository, GrantMatrixRepository, RoleRepository, TeamRepository,
};
pub use roles::{CreateRoleInput, GrantResult, RevokeResult};
pub use teams::CreateTeamInput;
