use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use shopgate_core::AppError;
use tracing_subscriber::EnvFilter;

/// Storage selected for every authorization port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageBackend,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_owned())
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => {
                let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
                    Ok(value) => value.parse::<u32>().map_err(|error| {
                        AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
                    })?,
                    Err(_) => 10,
                };

                StorageBackend::Postgres {
                    database_url: required_non_empty_env("DATABASE_URL")?,
                    max_connections,
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        if migrate_only && storage == StorageBackend::Memory {
            return Err(AppError::Validation(
                "the migrate command requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => 3001,
        };

        Ok(Self {
            migrate_only,
            storage,
            frontend_url,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
