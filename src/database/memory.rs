use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{
    movie::compare_by_rating, Movie, MovieWithReviews, NewMovie, NewReview, NewUser, Review, User,
};
use crate::database::password::PasswordHasher;
use crate::database::store::{AggregateQuery, HealthCheck, MovieStore, ReviewStore, StoreError, UserStore};
use crate::filter::ReviewFilter;

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    movies: Vec<Movie>,
    reviews: Vec<Review>,
}

/// Process-local store holding all three collections, in insertion order
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    hasher: PasswordHasher,
}

impl MemoryStore {
    pub fn new(password_hash_cost: u32) -> Self {
        Self {
            data: RwLock::new(Collections::default()),
            hasher: PasswordHasher::new(password_hash_cost),
        }
    }

    /// Insert a movie document as-is, bypassing create-time validation
    pub async fn insert_movie(&self, movie: Movie) {
        self.data.write().await.movies.push(movie);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        // Hash before taking the lock; the uniqueness check and insert share one write guard
        let password = self.hasher.hash(&user.password).await?;

        let mut data = self.data.write().await;
        if data.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(format!("username \"{}\" already exists", user.username)));
        }

        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            username: user.username,
            password,
        };
        data.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    async fn compare_password(&self, user: &User, candidate: &str) -> Result<bool, StoreError> {
        self.hasher.verify(candidate, &user.password).await
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let created = Movie {
            id: Uuid::new_v4(),
            title: Some(movie.title),
            release_date: Some(movie.release_date),
            genre: Some(movie.genre),
            actors: Some(movie.actors),
        };
        self.data.write().await.movies.push(created.clone());
        Ok(created)
    }

    async fn find_complete_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let data = self.data.read().await;
        Ok(data.movies.iter().filter(|m| m.is_complete()).cloned().collect())
    }

    async fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let data = self.data.read().await;
        Ok(data.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .movies
            .iter()
            .filter(|m| m.title.as_deref() == Some(title))
            .min_by_key(|m| m.id)
            .cloned())
    }

    async fn update_movie_title(&self, find_title: &str, update_title: &str) -> Result<Option<Movie>, StoreError> {
        let mut data = self.data.write().await;
        let Some(movie) = data
            .movies
            .iter_mut()
            .filter(|m| m.title.as_deref() == Some(find_title))
            .min_by_key(|m| m.id)
        else {
            return Ok(None);
        };

        let before = movie.clone();
        movie.title = Some(update_title.to_string());
        Ok(Some(before))
    }

    async fn delete_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let mut data = self.data.write().await;
        let position = data
            .movies
            .iter()
            .enumerate()
            .filter(|(_, m)| m.title.as_deref() == Some(title))
            .min_by_key(|(_, m)| m.id)
            .map(|(idx, _)| idx);
        Ok(position.map(|idx| data.movies.remove(idx)))
    }

    async fn aggregate_with_reviews(&self, query: AggregateQuery) -> Result<Vec<MovieWithReviews>, StoreError> {
        let data = self.data.read().await;

        let mut rows: Vec<MovieWithReviews> = data
            .movies
            .iter()
            .filter(|m| query.movie_id.map_or(true, |id| m.id == id))
            .map(|m| {
                let reviews = data.reviews.iter().filter(|r| r.movie_id == m.id).cloned().collect();
                MovieWithReviews::new(m.clone(), reviews)
            })
            .collect();

        rows.sort_by(compare_by_rating);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError> {
        review.validate()?;

        let created = Review {
            id: Uuid::new_v4(),
            movie_id: review.movie_id,
            username: review.username,
            review: review.review,
            rating: review.rating,
        };
        self.data.write().await.reviews.push(created.clone());
        Ok(created)
    }

    async fn find_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        let data = self.data.read().await;
        Ok(data.reviews.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
