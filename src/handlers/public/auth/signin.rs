// handlers/public/auth/signin.rs - POST /signin handler

use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::JsonBody;
use crate::router::AppState;

use super::signup::non_empty;

#[derive(Debug, Default, Deserialize)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

const AUTH_FAILED: &str = "Authentication failed.";

/// POST /signin - Authenticate and receive a token
///
/// Expected Output (Success):
/// ```json
/// { "success": true, "token": "JWT eyJhbGciOiJIUzI1NiI..." }
/// ```
///
/// Unknown users and wrong passwords both answer 401.
pub async fn signin(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SigninRequest>,
) -> Result<Json<Value>, ApiError> {
    let (Some(username), Some(password)) = (non_empty(payload.username), non_empty(payload.password)) else {
        tracing::warn!("Signin rejected: missing credentials");
        return Err(ApiError::unauthorized(AUTH_FAILED));
    };

    let user = match state.users.find_user_by_username(&username).await? {
        Some(user) => user,
        None => {
            tracing::warn!("Signin rejected: unknown user {}", username);
            return Err(ApiError::unauthorized(AUTH_FAILED));
        }
    };

    if !state.users.compare_password(&user, &password).await? {
        tracing::warn!("Signin rejected: password mismatch for {}", username);
        return Err(ApiError::unauthorized(AUTH_FAILED));
    }

    let token = state.tokens.issue(user.id, &user.username).map_err(|e| {
        tracing::error!("Token issuance failed: {}", e);
        ApiError::internal_server_error("Unable to issue token")
    })?;

    tracing::info!("Issued token for {}", user.username);
    Ok(Json(json!({ "success": true, "token": token })))
}
