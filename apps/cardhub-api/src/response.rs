use axum::Json;
use serde::Serialize;

/// Structured success envelope: status and message travel in the value
/// returned to the caller, never through shared state.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

pub fn ok<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
        message: message.to_string(),
    })
}
