//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_security_store;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_catalog_repository;
mod postgres_role_repository;
mod postgres_rows;
mod postgres_team_repository;

pub use in_memory_security_store::InMemorySecurityStore;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_team_repository::PostgresTeamRepository;
