use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// `{"success": bool, "message": string}` reply with an explicit status
///
/// Routes in this API report validation problems in the body rather than the
/// status line, so a failure can still carry `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub status: StatusCode,
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    /// 200 with `success: true`
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
        }
    }

    /// 200 with `success: false`; used for missing-field validation
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::failure(StatusCode::OK, message)
    }

    /// Any status with `success: false`
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for StatusMessage {
    fn into_response(self) -> Response {
        let body = json!({
            "success": self.success,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Raw JSON document reply (lists, movie documents) with a 200 status
#[derive(Debug)]
pub struct Document<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Document<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.0) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                StatusMessage::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize response data")
                    .into_response()
            }
        }
    }
}
