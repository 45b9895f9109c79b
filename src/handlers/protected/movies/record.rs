use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::database::AggregateQuery;
use crate::middleware::{Document, StatusMessage};
use crate::router::AppState;

use super::collection::ReviewsQuery;

/// GET /movies/:movie_id - one movie, joined with its reviews when `?reviews=true`
pub async fn get(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(query): Query<ReviewsQuery>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&movie_id) else {
        return StatusMessage::failure(StatusCode::BAD_REQUEST, format!("Invalid movie id: {}", movie_id))
            .into_response();
    };

    let movie = match state.movies.find_movie_by_id(id).await {
        Ok(Some(movie)) => movie,
        Ok(None) => {
            return StatusMessage::failure(StatusCode::NOT_FOUND, "Movie not found").into_response();
        }
        Err(e) => {
            tracing::error!("Movie lookup failed: {}", e);
            return StatusMessage::failure(StatusCode::BAD_REQUEST, "Unable to look up movie.").into_response();
        }
    };

    if !query.wants_reviews() {
        return Document(movie).into_response();
    }

    match state.movies.aggregate_with_reviews(AggregateQuery::single(id)).await {
        Ok(rows) => match rows.into_iter().next() {
            Some(row) => Document(row).into_response(),
            // Deleted between the lookup and the aggregation
            None => StatusMessage::failure(StatusCode::NOT_FOUND, "Reviews not found").into_response(),
        },
        Err(e) => {
            tracing::error!("Review aggregation for {} failed: {}", id, e);
            StatusMessage::failure(StatusCode::NOT_FOUND, "Reviews not found").into_response()
        }
    }
}
