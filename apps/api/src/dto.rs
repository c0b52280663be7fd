mod ability;
mod catalog;
mod common;
mod roles;
mod teams;

pub use ability::{AbilityCheckRequest, AbilityCheckResponse, AbilityResponse, RequirementRequest};
pub use catalog::{
    CreateResourceRequest, PermissionResponse, ResourceResponse, UpdateResourceRequest,
};
pub use common::{
    BulkFailureResponse, BulkRemoveResponse, CreatedResponse, HealthResponse, RemovedResponse,
};
pub use roles::{
    BulkGrantAddResponse, BulkPermissionsRequest, CreateRoleRequest, EffectiveRolesQuery,
    EffectiveRolesResponse, GrantRequest, RoleResponse, UpdateRoleRequest,
};
pub use teams::{
    AddMemberRequest, BulkRoleAddResponse, BulkRoleIdsRequest, CreateTeamRequest,
    TeamMemberResponse, TeamResponse, UpdateTeamRequest,
};
