use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Run a program on the execution backend
#[utoipa::path(
    post,
    path = "/api/compile",
    request_body = CompileRequest,
    responses(
        (status = 200, description = "Execution backend reply, passed through"),
        (status = 400, description = "Unsupported language", body = ErrorResponse),
        (status = 500, description = "Execution backend failed", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn compile_doc() {}

/// Export a document room's operation log
#[utoipa::path(
    get,
    path = "/api/v1/documents/{room_id}",
    params(
        ("room_id" = String, Path, description = "Document room key")
    ),
    responses(
        (status = 200, description = "Stored operation log", body = DocumentExportResponse),
        (status = 404, description = "No log for this room", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn doc_export_doc() {}

/// Connection and room counters
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Current counters", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        compile_doc,
        doc_export_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            CompileRequest,
            DocumentExportResponse,
            ClientInfo,
            DiagnosticsResponse
        )
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
