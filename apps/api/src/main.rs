//! Insightdeck API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dev_seed;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use insightdeck_core::AppError;
use insightdeck_infrastructure::{InMemoryWorkspaceStore, PostgresWorkspaceStore};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    WorkspaceStore, build_app_state, build_memory_session_layer, build_postgres_session_layer,
    connect_and_migrate,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if config.migrate_only {
        let database_url = config.database_url.as_deref().ok_or_else(|| {
            AppError::Validation("DATABASE_URL is required to run migrations".to_owned())
        })?;
        connect_and_migrate(database_url).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
            let pool = connect_and_migrate(database_url).await?;
            let session_layer =
                build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;

            serve(
                &config,
                Arc::new(PostgresWorkspaceStore::new(pool)),
                session_layer,
            )
            .await
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; all state is lost on shutdown");

            serve(
                &config,
                Arc::new(InMemoryWorkspaceStore::new()),
                build_memory_session_layer(config.cookie_secure),
            )
            .await
        }
    }
}

async fn serve<S, Store>(
    config: &ApiConfig,
    store: Arc<S>,
    session_layer: SessionManagerLayer<Store>,
) -> Result<(), AppError>
where
    S: WorkspaceStore,
    Store: SessionStore + Clone,
{
    if let Some(account) = &config.seed_super_admin {
        dev_seed::ensure_super_admin(store.as_ref(), account).await?;
    }

    let app_state = build_app_state(store, config);
    let app = build_router(app_state, &config.frontend_url, session_layer)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, "insightdeck-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
