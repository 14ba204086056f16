use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::ClientInfo;

/// Stored operation log of a document room and who is editing it
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExportResponse {
    pub room_id: String,
    #[schema(value_type = Vec<Object>)]
    pub ops: Vec<Value>,
    pub clients: Vec<ClientInfo>,
}
