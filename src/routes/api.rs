use crate::handlers::{compile, diagnostics, doc_export, health_check, ready_check};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn create_api_routes(app_state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/compile", post(compile))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/v1/documents/:room_id", get(doc_export))
        .with_state(app_state)
}
