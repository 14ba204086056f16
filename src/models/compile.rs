use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for running a program
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CompileRequest {
    pub code: String,
    pub language: String,
}
