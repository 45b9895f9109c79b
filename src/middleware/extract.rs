use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` with rejections rendered as `{"success": false, "message"}`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
