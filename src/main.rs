mod clients;
mod config;
mod docs;
mod handlers;
mod models;
mod routes;
mod services;
mod session;
mod utils;
mod websocket;

use config::Config;
use clients::jdoodle_client::JdoodleClient;
use routes::create_app;
use services::compile_service::{CompileService, ExecutionBackend};
use session::{DocumentStore, SessionCoordinator};
use std::panic;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use websocket::ConnectionHub;

/// Everything a request or socket handler needs
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub coordinator: Arc<SessionCoordinator>,
    pub hub: Arc<ConnectionHub>,
    pub compiler: Arc<CompileService>,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn ExecutionBackend>) -> Self {
        let documents = DocumentStore::new(config.doc_max_rooms, config.doc_idle_ttl());
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(SessionCoordinator::new(documents)),
            hub: Arc::new(ConnectionHub::new()),
            compiler: Arc::new(CompileService::new(backend)),
        }
    }
}

#[cfg(test)]
pub fn test_state_with(backend: Arc<dyn ExecutionBackend>) -> AppState {
    AppState::new(Config::default(), backend)
}

#[cfg(test)]
pub fn test_state() -> AppState {
    test_state_with(Arc::new(
        services::compile_service::tests::FakeBackend::new(false),
    ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "colabri_rooms=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    if config.jdoodle_client_id.is_none() || config.jdoodle_client_secret.is_none() {
        warn!("No execution backend credentials configured - compile requests will fail");
    }

    let backend = match JdoodleClient::new(
        config.jdoodle_url.clone(),
        config.jdoodle_client_id.clone(),
        config.jdoodle_client_secret.clone(),
        config.compile_timeout(),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create execution backend client: {}", e);
            return;
        }
    };

    let address = config.server_address();
    let development = config.is_development();
    let app_state = AppState::new(config, backend);
    let app_routes = create_app(app_state);

    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", address, e);
            return;
        }
    };

    info!("🚀 Server running on http://{}", address);
    info!("📡 WebSocket available at ws://{}/ws", address);
    if development {
        info!("📚 Swagger UI available at http://{}/swagger", address);
    }

    if let Err(e) = axum::serve(listener, app_routes).await {
        error!("Server error: {}", e);
    }
}
