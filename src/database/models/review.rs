use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "movieId")]
    pub movie_id: Uuid,
    pub username: Option<String>,
    pub review: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: Uuid,
    pub username: Option<String>,
    pub review: Option<String>,
    pub rating: Option<f64>,
}

impl NewReview {
    /// Document-level validation applied by every store before insert
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.username.as_deref().map_or(true, str::is_empty) {
            return Err(StoreError::Validation("Path `username` is required.".to_string()));
        }
        if self.review.as_deref().map_or(true, str::is_empty) {
            return Err(StoreError::Validation("Path `review` is required.".to_string()));
        }
        match self.rating {
            None => Err(StoreError::Validation("Path `rating` is required.".to_string())),
            Some(r) if !r.is_finite() => Err(StoreError::Validation("Path `rating` must be a number.".to_string())),
            Some(_) => Ok(()),
        }
    }
}
