//! Event Registration - Entry point.

use event_registration::{
    api::{create_router, AppState},
    auth::{AdminCredentials, AdminGate},
    config::Config,
    registry::{RegistrationService, Store},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Event Registration");

    // Initialize storage; failing to create the document is fatal
    let store = if config.storage.persist {
        match Store::file(config.storage.path.clone()).await {
            Ok(s) => {
                info!("Using registration file {:?}", config.storage.path);
                s
            }
            Err(e) => {
                error!(
                    "Failed to initialize registration file {:?}: {}",
                    config.storage.path, e
                );
                std::process::exit(1);
            }
        }
    } else {
        info!("Persistence disabled, using in-memory storage");
        Store::memory()
    };

    let service = RegistrationService::new(Arc::new(store));
    let gate = AdminGate::new(AdminCredentials::new(
        config.admin_username.clone(),
        config.admin_password,
    ));

    // Create application state
    let state = AppState::new(service, gate, config.web.static_dir.clone());

    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Server listening on http://{}", addr);
    info!(admin = %config.admin_username, "Admin account configured");

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
