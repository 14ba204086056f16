use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::error;

use crate::models::{api_error, ApiError, CompileRequest};
use crate::services::compile_service::CompileError;
use crate::AppState;

/// Run a program on the execution backend and return its verbatim reply
pub async fn compile(
    State(app_state): State<AppState>,
    Json(request): Json<CompileRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    match app_state
        .compiler
        .compile(&request.code, &request.language)
        .await
    {
        Ok(result) => Ok((StatusCode::OK, Json(result))),
        Err(e @ CompileError::UnsupportedLanguage(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!("Compile request for '{}' failed: {}", request.language, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to compile code",
            ))
        }
    }
}
