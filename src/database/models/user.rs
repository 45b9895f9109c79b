use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: Option<String>,
    pub username: String,
    /// bcrypt hash, never serialized back to clients
    #[serde(skip_serializing)]
    pub password: String,
}

/// Signup payload after presence checks; the password is still plaintext here
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub username: String,
    pub password: String,
}
