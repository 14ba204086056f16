pub mod api;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::docs::ApiDoc;
use crate::websocket::websocket_handler;
use crate::AppState;
use api::create_api_routes;

/// The whole HTTP surface: REST under /api, the socket at /ws, Swagger UI
pub fn create_app(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);
    let ws_routes = Router::<AppState>::new()
        .route("/ws", get(websocket_handler))
        .with_state(app_state.clone());

    Router::new()
        .nest("/api", create_api_routes(app_state))
        .merge(ws_routes)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Delta;
    use crate::services::compile_service::tests::FakeBackend;
    use crate::session::{ConnectionId, RoomKind};
    use crate::{test_state, test_state_with};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::{atomic::Ordering, Arc};
    use tower::ServiceExt;

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn compile_request(language: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/compile")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"code": "print(1)", "language": language}).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(create_app(test_state()), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unsupported_language_is_rejected_before_backend() {
        let backend = Arc::new(FakeBackend::new(false));
        let app = create_app(test_state_with(backend.clone()));
        let (status, body) = call(app, compile_request("cobol")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["error"], "Unsupported language 'cobol'");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_reply_is_passed_through() {
        let backend = Arc::new(FakeBackend::new(false));
        let app = create_app(test_state_with(backend.clone()));
        let (status, body) = call(app, compile_request("python3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["versionIndex"], "3");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_failure_is_a_generic_500() {
        let app = create_app(test_state_with(Arc::new(FakeBackend::new(true))));
        let (status, body) = call(app, compile_request("rust")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to compile code");
    }

    #[tokio::test]
    async fn document_export_reports_log_and_editors() {
        let app_state = test_state();
        let (status, _) = call(create_app(app_state.clone()), get_request("/api/v1/documents/r1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let a = ConnectionId::from("a");
        app_state.coordinator.connect(&a);
        app_state.coordinator.join(&a, RoomKind::Document, "r1", "alice");
        app_state
            .coordinator
            .apply_document_change(&a, "r1", Delta::new(vec![json!({"insert": "hi"})]));

        let (status, body) = call(create_app(app_state), get_request("/api/v1/documents/r1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "roomId": "r1",
                "ops": [{"insert": "hi"}],
                "clients": [{"socketId": "a", "username": "alice"}]
            })
        );
    }

    #[tokio::test]
    async fn diagnostics_counts_rooms() {
        let app_state = test_state();
        let a = ConnectionId::from("a");
        app_state.coordinator.connect(&a);
        app_state.coordinator.join(&a, RoomKind::Code, "r1", "alice");
        app_state.coordinator.join(&a, RoomKind::Document, "r1", "alice");
        app_state.coordinator.join(&a, RoomKind::Voice, "r1", "alice");

        let (status, body) = call(create_app(app_state), get_request("/api/v1/diagnostics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["n_conn"], 1);
        assert_eq!(body["n_rooms"], 1);
        assert_eq!(body["n_voice_rooms"], 1);
    }
}
