use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::NewReview;
use crate::filter::ReviewFilter;
use crate::middleware::{AuthUser, Document, JsonBody, StatusMessage};
use crate::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(rename = "movieId")]
    pub movie_id: Option<String>,
    pub username: Option<String>,
    pub review: Option<String>,
    /// Number or numeric string
    pub rating: Option<Value>,
}

fn rating_from(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// POST /reviews - attach a review to an existing movie
///
/// The author defaults to the authenticated user when `username` is absent.
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateReviewRequest>,
) -> Response {
    let Some(movie_id) = payload.movie_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return StatusMessage::failure(StatusCode::BAD_REQUEST, "Movie ID is required.").into_response();
    };

    let not_found = || {
        StatusMessage::failure(StatusCode::NOT_FOUND, "Movie not found. Unable to create review.").into_response()
    };

    // An id that cannot name a movie is simply a missing movie
    let Ok(movie_id) = Uuid::parse_str(movie_id) else {
        return not_found();
    };

    match state.movies.find_movie_by_id(movie_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(),
        Err(e) => {
            tracing::error!("Movie lookup for review failed: {}", e);
            return StatusMessage::failure(StatusCode::BAD_REQUEST, "Unable to create review.").into_response();
        }
    }

    let review = NewReview {
        movie_id,
        username: payload.username.filter(|u| !u.is_empty()).or(Some(user.username)),
        review: payload.review,
        rating: rating_from(payload.rating),
    };

    match state.reviews.create_review(review).await {
        Ok(created) => {
            tracing::info!("Review {} created for movie {}", created.id, created.movie_id);
            StatusMessage::ok("Review created!").into_response()
        }
        Err(e) => {
            tracing::error!("Review insert failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Failed to create movie review.",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// GET /reviews - reviews matching the raw query parameters
pub async fn get(State(state): State<AppState>, Query(query): Query<HashMap<String, String>>) -> Response {
    let filter = match ReviewFilter::from_query(&query) {
        Ok(filter) => filter,
        Err(e) => {
            tracing::warn!("Review filter rejected: {}", e);
            return StatusMessage::failure(StatusCode::BAD_REQUEST, "Failed to get reviews.").into_response();
        }
    };

    if filter.matches_nothing() {
        tracing::debug!("Review filter names unknown fields: {:?}", filter.unknown);
    }

    match state.reviews.find_reviews(&filter).await {
        Ok(reviews) => Document(reviews).into_response(),
        Err(e) => {
            tracing::error!("Review query failed: {}", e);
            StatusMessage::failure(StatusCode::BAD_REQUEST, "Failed to get reviews.").into_response()
        }
    }
}
