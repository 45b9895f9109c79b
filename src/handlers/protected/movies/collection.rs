use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;

use crate::database::models::{NewMovie, MIN_ACTORS};
use crate::database::AggregateQuery;
use crate::middleware::{AuthUser, Document, JsonBody, StatusMessage};
use crate::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewsQuery {
    pub reviews: Option<String>,
}

impl ReviewsQuery {
    /// Only the literal string "true" turns the review join on
    pub fn wants_reviews(&self) -> bool {
        self.reviews.as_deref() == Some("true")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    /// Accepted as a string or a bare year number
    #[serde(rename = "releaseDate")]
    pub release_date: Option<Value>,
    pub genre: Option<String>,
    pub actors: Option<Vec<String>>,
}

impl CreateMovieRequest {
    /// All fields present and at least three named actors
    fn into_new_movie(self) -> Option<NewMovie> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let release_date = match self.release_date? {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let genre = self.genre.filter(|g| !g.is_empty())?;
        let actors = self.actors?;
        if actors.len() < MIN_ACTORS || actors.iter().take(MIN_ACTORS).any(|a| a.is_empty()) {
            return None;
        }

        Some(NewMovie {
            title,
            release_date,
            genre,
            actors,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleChangeRequest {
    pub find_title: Option<String>,
    pub update_title: Option<String>,
}

/// GET /movies - complete movies, or every movie joined with its reviews when `?reviews=true`
pub async fn get(State(state): State<AppState>, Query(query): Query<ReviewsQuery>) -> Response {
    if query.wants_reviews() {
        return match state.movies.aggregate_with_reviews(AggregateQuery::all()).await {
            Ok(rows) => Document(rows).into_response(),
            Err(e) => {
                tracing::error!("Movie aggregation failed: {}", e);
                StatusMessage::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load movies with reviews.")
                    .into_response()
            }
        };
    }

    match state.movies.find_complete_movies().await {
        Ok(movies) => Document(movies).into_response(),
        Err(e) => {
            tracing::error!("Movie listing failed: {}", e);
            StatusMessage::failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load movies.").into_response()
        }
    }
}

/// POST /movies - create a movie with a title not already taken
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateMovieRequest>,
) -> StatusMessage {
    let Some(movie) = payload.into_new_movie() else {
        tracing::warn!("Movie rejected: incomplete payload from {}", user.username);
        return StatusMessage::rejected(
            "Please include all information for title, year released, genre, and 3 actors.",
        );
    };

    // Best-effort uniqueness: the check and the insert are not atomic
    match state.movies.find_movie_by_title(&movie.title).await {
        Ok(Some(_)) => {
            tracing::warn!("Movie rejected: \"{}\" already exists", movie.title);
            return StatusMessage::failure(StatusCode::BAD_REQUEST, "That movie already exists.");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Movie title lookup failed: {}", e);
            return StatusMessage::failure(StatusCode::FORBIDDEN, "Failed to create movie.");
        }
    }

    match state.movies.create_movie(movie).await {
        Ok(created) => {
            tracing::info!(
                "{} created movie \"{}\" ({})",
                user.username,
                created.title.as_deref().unwrap_or_default(),
                created.id
            );
            StatusMessage::ok("Successfully created movie.")
        }
        Err(e) => {
            tracing::error!("Movie insert failed: {}", e);
            StatusMessage::failure(StatusCode::FORBIDDEN, "Failed to create movie.")
        }
    }
}

/// PUT /movies - retitle the movie matching `find_title`
pub async fn put(State(state): State<AppState>, JsonBody(payload): JsonBody<TitleChangeRequest>) -> StatusMessage {
    let (Some(find_title), Some(update_title)) = (
        payload.find_title.filter(|t| !t.is_empty()),
        payload.update_title.filter(|t| !t.is_empty()),
    ) else {
        return StatusMessage::rejected(
            "Please provide a title to be updated as well as the new updated title.",
        );
    };

    // Titles address movies, so a rename must not collide with another movie
    if update_title != find_title {
        match state.movies.find_movie_by_title(&update_title).await {
            Ok(Some(_)) => {
                tracing::warn!("Retitle rejected: \"{}\" already exists", update_title);
                return StatusMessage::failure(StatusCode::BAD_REQUEST, "That movie already exists.");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Movie title lookup failed: {}", e);
                return StatusMessage::failure(StatusCode::FORBIDDEN, "Unable to update title passed in.");
            }
        }
    }

    match state.movies.update_movie_title(&find_title, &update_title).await {
        Ok(Some(_)) => {
            tracing::info!("Retitled \"{}\" to \"{}\"", find_title, update_title);
            StatusMessage::ok("Successfully updated title.")
        }
        Ok(None) => StatusMessage::failure(StatusCode::BAD_REQUEST, "Unable to find title to update."),
        Err(e) => {
            tracing::error!("Movie update failed: {}", e);
            StatusMessage::failure(StatusCode::FORBIDDEN, "Unable to update title passed in.")
        }
    }
}

/// DELETE /movies - delete the movie matching `find_title`
pub async fn delete(State(state): State<AppState>, JsonBody(payload): JsonBody<TitleChangeRequest>) -> StatusMessage {
    let Some(find_title) = payload.find_title.filter(|t| !t.is_empty()) else {
        return StatusMessage::rejected("Please provide a title to delete.");
    };

    match state.movies.delete_movie_by_title(&find_title).await {
        Ok(Some(_)) => {
            tracing::info!("Deleted \"{}\"", find_title);
            StatusMessage::ok("Successfully deleted title.")
        }
        Ok(None) => StatusMessage::failure(StatusCode::BAD_REQUEST, "Unable to find title to delete."),
        Err(e) => {
            tracing::error!("Movie delete failed: {}", e);
            StatusMessage::failure(StatusCode::FORBIDDEN, "Unable to delete title passed in.")
        }
    }
}

/// Any other method on /movies
pub async fn method_not_supported() -> StatusMessage {
    StatusMessage::failure(
        StatusCode::FORBIDDEN,
        "This HTTP method is not supported. Only GET, POST, PUT, and DELETE are supported.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CreateMovieRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_three_actors_and_numeric_year() {
        let movie = request(json!({
            "title": "Heat",
            "releaseDate": 1995,
            "genre": "Crime",
            "actors": ["Al Pacino", "Robert De Niro", "Val Kilmer"]
        }))
        .into_new_movie()
        .unwrap();
        assert_eq!(movie.release_date, "1995");
        assert_eq!(movie.actors.len(), 3);
    }

    #[test]
    fn rejects_short_cast_or_missing_fields() {
        let two_actors = request(json!({
            "title": "Heat", "releaseDate": "1995", "genre": "Crime",
            "actors": ["Al Pacino", "Robert De Niro"]
        }));
        assert!(two_actors.into_new_movie().is_none());

        let blank_actor = request(json!({
            "title": "Heat", "releaseDate": "1995", "genre": "Crime",
            "actors": ["Al Pacino", "", "Val Kilmer"]
        }));
        assert!(blank_actor.into_new_movie().is_none());

        let no_genre = request(json!({
            "title": "Heat", "releaseDate": "1995",
            "actors": ["a", "b", "c"]
        }));
        assert!(no_genre.into_new_movie().is_none());
    }

    #[test]
    fn reviews_flag_is_literal() {
        let on = ReviewsQuery { reviews: Some("true".to_string()) };
        let off = ReviewsQuery { reviews: Some("TRUE".to_string()) };
        assert!(on.wants_reviews());
        assert!(!off.wants_reviews());
        assert!(!ReviewsQuery::default().wants_reviews());
    }
}
