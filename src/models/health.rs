use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for liveness and readiness probes
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// Server time, RFC 3339
    pub time: String,
}
