//! HTTP API for the registration backend.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::auth::AdminGate;
use crate::registry::RegistrationService;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration service (owns the store)
    pub service: Arc<RegistrationService>,
    /// Admin credential gate
    pub gate: Arc<AdminGate>,
    /// Directory with the registration form UI
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: RegistrationService, gate: AdminGate, static_dir: PathBuf) -> Self {
        Self {
            service: Arc::new(service),
            gate: Arc::new(gate),
            static_dir,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let index = ServeFile::new(state.static_dir.join("index.html"));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/health", get(handlers::health))
        .route_service("/", index)
        .nest_service("/static", assets)
        .route("/api/register", post(handlers::register))
        .route("/api/admin/login", post(handlers::admin_login))
        .route("/api/admin/registrations", get(handlers::list_registrations))
        .route("/api/admin/export", get(handlers::export_registrations))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
