use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error};

use crate::models::{api_error, ApiError, DocumentExportResponse};
use crate::session::RoomId;
use crate::AppState;

/// Export the operation log of a room with its current members
pub async fn doc_export(
    State(app_state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<(StatusCode, Json<DocumentExportResponse>), ApiError> {
    let ops = match app_state.coordinator.document(&room_id) {
        Some(ops) => ops,
        None => {
            error!("Document '{}' not found", room_id);
            return Err(api_error(
                StatusCode::NOT_FOUND,
                format!("Document '{}' not found", room_id),
            ));
        }
    };
    let clients = app_state.coordinator.clients(&RoomId::shared(room_id.as_str()));
    debug!(
        "Exporting document '{}' ({} ops, {} members)",
        room_id,
        ops.len(),
        clients.len()
    );

    Ok((
        StatusCode::OK,
        Json(DocumentExportResponse {
            room_id,
            ops,
            clients,
        }),
    ))
}
