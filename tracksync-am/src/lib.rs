//! tracksync-am library interface
//!
//! Exposes the service internals for integration testing.

pub mod api;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod store;
pub mod trakt;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::trakt::TraktClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Trakt API client
    pub trakt: TraktClient,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, trakt: TraktClient) -> Self {
        Self {
            db,
            trakt,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::accounts::account_routes())
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
