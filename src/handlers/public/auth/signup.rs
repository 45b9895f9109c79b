// handlers/public/auth/signup.rs - POST /signup handler

use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;

use crate::database::models::NewUser;
use crate::database::StoreError;
use crate::middleware::{JsonBody, StatusMessage};
use crate::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /signup - Create a user account
///
/// Expected Input:
/// ```json
/// { "name": "string", "username": "string", "password": "string" }
/// ```
///
/// Missing username or password, and duplicate usernames, are reported as
/// `200 {"success": false}` without an error status.
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> impl IntoResponse {
    let (Some(username), Some(password)) = (non_empty(payload.username), non_empty(payload.password)) else {
        tracing::warn!("Signup rejected: missing username or password");
        return StatusMessage::rejected("Please include both username and password to signup.");
    };

    let user = NewUser {
        name: payload.name,
        username,
        password,
    };

    match state.users.create_user(user).await {
        Ok(created) => {
            tracing::info!("Created user {} ({})", created.username, created.id);
            StatusMessage::ok("Successfully created new user.")
        }
        Err(StoreError::Duplicate(_)) => {
            tracing::warn!("Signup rejected: username already exists");
            StatusMessage::rejected("A user with that username already exists.")
        }
        Err(e) => {
            tracing::error!("Signup failed: {}", e);
            StatusMessage::rejected(e.to_string())
        }
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
