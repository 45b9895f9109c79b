use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::review::Review;

/// Minimum cast size accepted when a movie is created
pub const MIN_ACTORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub actors: Option<Vec<String>>,
}

impl Movie {
    /// All listing fields present; the plain movie listing only returns these
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.release_date.is_some() && self.genre.is_some() && self.actors.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub release_date: String,
    pub genre: String,
    pub actors: Vec<String>,
}

/// Movie joined with its reviews and their average rating; computed, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieWithReviews {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "avgRating")]
    pub avg_rating: Option<f64>,
    pub movie_reviews: Vec<Review>,
}

impl MovieWithReviews {
    pub fn new(movie: Movie, movie_reviews: Vec<Review>) -> Self {
        let avg_rating = average_rating(&movie_reviews);
        Self {
            movie,
            avg_rating,
            movie_reviews,
        }
    }
}

/// Mean rating over the reviews that carry one; None when nothing is rated
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews.iter().filter_map(|r| r.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Highest average first, unrated movies last, then title and id for a stable order
pub fn compare_by_rating(a: &MovieWithReviews, b: &MovieWithReviews) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    let by_rating = match (a.avg_rating, b.avg_rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_rating
        .then_with(|| a.movie.title.cmp(&b.movie.title))
        .then_with(|| a.movie.id.cmp(&b.movie.id))
}
