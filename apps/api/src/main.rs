//! Shopgate authorization API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use shopgate_core::AppError;
use shopgate_infrastructure::InMemorySecurityStore;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend};
use crate::api_services::{RepositorySet, build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let repositories = match &config.storage {
        StorageBackend::Memory => {
            info!("using in-memory authorization store");
            RepositorySet::in_memory(Arc::new(InMemorySecurityStore::new()))
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            RepositorySet::postgres(&pool)
        }
    };

    let app_state = build_app_state(repositories);
    let report = app_state.security_admin_service.bootstrap_catalog().await?;
    info!(
        permissions = report.permissions.len(),
        reserved_resources = report.reserved_resources.len(),
        super_admin_role = %report.super_admin_role.name(),
        "authorization catalog bootstrapped"
    );

    let app = api_router::build_router(app_state, config.frontend_url.as_str())?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "shopgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
