use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Movie, MovieWithReviews, NewMovie, NewReview, NewUser, Review, User};
use crate::filter::{FilterError, ReviewFilter};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key violated (duplicate username)
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Store error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable(err.to_string()),
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Duplicate(db.message().to_string())
            }
            other => StoreError::Database(DatabaseError::Sqlx(other)),
        }
    }
}

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Shape of a movie aggregation: optionally one movie, optionally capped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateQuery {
    pub movie_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl AggregateQuery {
    /// Every movie, best rated first
    pub fn all() -> Self {
        Self::default()
    }

    /// A single movie by id
    pub fn single(movie_id: Uuid) -> Self {
        Self {
            movie_id: Some(movie_id),
            limit: Some(1),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hash the password and persist; a taken username is `StoreError::Duplicate`
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Compare a candidate password with the stored hash
    async fn compare_password(&self, user: &User, candidate: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, StoreError>;

    /// Movies whose title, release date, genre and actors are all present
    async fn find_complete_movies(&self) -> Result<Vec<Movie>, StoreError>;

    async fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError>;

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError>;

    /// Retitle the first movie matching `find_title`, returning the pre-update document
    async fn update_movie_title(&self, find_title: &str, update_title: &str) -> Result<Option<Movie>, StoreError>;

    /// Delete the first movie matching `title`, returning the deleted document
    async fn delete_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError>;

    /// Left-join reviews on movie id, average their ratings, best rated first
    async fn aggregate_with_reviews(&self, query: AggregateQuery) -> Result<Vec<MovieWithReviews>, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn find_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError>;
}

/// Liveness probe used by the health endpoint
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
