//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{PasswordService, Repositories, TokenService};
use yatube_core::services::Services;
use yatube_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use yatube_infra::DatabaseConnections;

use crate::config::AppConfig;

/// Which entity store backs the running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres => "postgres",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub repos: Repositories,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub backend: StorageBackend,
    #[cfg(feature = "postgres")]
    pub db: Option<DatabaseConnections>,
}

impl AppState {
    /// State over an already assembled set of repositories.
    pub fn with_repositories(
        repos: Repositories,
        config: &AppConfig,
        backend: StorageBackend,
    ) -> Self {
        Self {
            services: Services::new(&repos, config.pagination),
            repos,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            backend,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_repositories(
            InMemoryStore::new().repositories(),
            config,
            StorageBackend::Memory,
        )
    }

    /// Build the application state with appropriate implementations.
    #[cfg(feature = "postgres")]
    pub async fn new(config: &AppConfig) -> Self {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory(config);
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let mut state = Self::with_repositories(
                    connections.repositories(),
                    config,
                    StorageBackend::Postgres,
                );
                state.db = Some(connections);
                tracing::info!("Application state initialized");
                state
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory(config)
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn new(config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory store");
        Self::in_memory(config)
    }
}
