use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard single-item response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(payload: T) -> Self {
        Self { ok: true, payload }
    }
}

/// Message-only response, e.g. `{"msg": "PASSWORD_CHANGED"}`
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
    /// Only present outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            verification: None,
        }
    }

    pub fn with_verification(msg: impl Into<String>, verification: Option<String>) -> Self {
        Self {
            msg: msg.into(),
            verification,
        }
    }
}

/// Created response helper for POST endpoints
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(ApiResponse::success(self.0))).into_response()
    }
}

/// No content response helper
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
