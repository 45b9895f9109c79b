use async_trait::async_trait;
use sqlx::{postgres::PgRow, types::Json, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Movie, MovieWithReviews, NewMovie, NewReview, NewUser, Review, User};
use crate::database::password::PasswordHasher;
use crate::database::store::{AggregateQuery, HealthCheck, MovieStore, ReviewStore, StoreError, UserStore};
use crate::filter::ReviewFilter;

const MOVIE_COLUMNS: &str = "id, title, release_date, genre, actors";
const REVIEW_COLUMNS: &str = "id, movie_id, username, review, rating";

/// Postgres-backed store for users, movies and reviews
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl PgStore {
    pub fn new(pool: PgPool, password_hash_cost: u32) -> Self {
        Self {
            pool,
            hasher: PasswordHasher::new(password_hash_cost),
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let password = self.hasher.hash(&user.password).await?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, username, password)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, username, password",
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.username)
        .bind(&password)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn compare_password(&self, user: &User, candidate: &str) -> Result<bool, StoreError> {
        self.hasher.verify(candidate, &user.password).await
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let sql = format!(
            "INSERT INTO movies ({MOVIE_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {MOVIE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Movie>(&sql)
            .bind(Uuid::new_v4())
            .bind(&movie.title)
            .bind(&movie.release_date)
            .bind(&movie.genre)
            .bind(&movie.actors)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_complete_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let sql = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies
             WHERE title IS NOT NULL AND release_date IS NOT NULL
               AND genre IS NOT NULL AND actors IS NOT NULL"
        );
        let movies = sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?;
        Ok(movies)
    }

    async fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE title = $1 ORDER BY id LIMIT 1");
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn update_movie_title(&self, find_title: &str, update_title: &str) -> Result<Option<Movie>, StoreError> {
        // The CTE snapshot yields the row as it was before the update
        let sql = format!(
            "WITH target AS (
                 SELECT {MOVIE_COLUMNS} FROM movies WHERE title = $1 ORDER BY id LIMIT 1 FOR UPDATE
             ), updated AS (
                 UPDATE movies SET title = $2 FROM target WHERE movies.id = target.id
             )
             SELECT {MOVIE_COLUMNS} FROM target"
        );
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(find_title)
            .bind(update_title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn delete_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        let sql = format!(
            "DELETE FROM movies
             WHERE id = (SELECT id FROM movies WHERE title = $1 ORDER BY id LIMIT 1)
             RETURNING {MOVIE_COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn aggregate_with_reviews(&self, query: AggregateQuery) -> Result<Vec<MovieWithReviews>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT m.id, m.title, m.release_date, m.genre, m.actors,
                    AVG(r.rating) AS avg_rating,
                    COALESCE(
                        json_agg(json_build_object(
                            '_id', r.id,
                            'movieId', r.movie_id,
                            'username', r.username,
                            'review', r.review,
                            'rating', r.rating
                        ) ORDER BY r.id) FILTER (WHERE r.id IS NOT NULL),
                        '[]'::json
                    ) AS movie_reviews
             FROM movies m
             LEFT JOIN reviews r ON r.movie_id = m.id",
        );

        if let Some(movie_id) = query.movie_id {
            builder.push(" WHERE m.id = ").push_bind(movie_id);
        }

        builder.push(" GROUP BY m.id ORDER BY avg_rating DESC NULLS LAST, m.title ASC, m.id ASC");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(movie_with_reviews_from_row).collect()
    }
}

fn movie_with_reviews_from_row(row: &PgRow) -> Result<MovieWithReviews, StoreError> {
    let movie = Movie {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        release_date: row.try_get("release_date")?,
        genre: row.try_get("genre")?,
        actors: row.try_get("actors")?,
    };
    let avg_rating: Option<f64> = row.try_get("avg_rating")?;
    let Json(movie_reviews): Json<Vec<Review>> = row.try_get("movie_reviews")?;

    Ok(MovieWithReviews {
        movie,
        avg_rating,
        movie_reviews,
    })
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError> {
        review.validate()?;

        let sql = format!(
            "INSERT INTO reviews ({REVIEW_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Review>(&sql)
            .bind(Uuid::new_v4())
            .bind(review.movie_id)
            .bind(&review.username)
            .bind(&review.review)
            .bind(review.rating)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        if filter.matches_nothing() {
            return Ok(vec![]);
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE TRUE"));

        if let Some(id) = filter.id {
            builder.push(" AND id = ").push_bind(id);
        }
        if let Some(movie_id) = filter.movie_id {
            builder.push(" AND movie_id = ").push_bind(movie_id);
        }
        if let Some(username) = &filter.username {
            builder.push(" AND username = ").push_bind(username.clone());
        }
        if let Some(text) = &filter.review {
            builder.push(" AND review = ").push_bind(text.clone());
        }
        if let Some(rating) = filter.rating {
            builder.push(" AND rating = ").push_bind(rating);
        }
        builder.push(" ORDER BY id");

        let reviews = builder.build_query_as::<Review>().fetch_all(&self.pool).await?;
        Ok(reviews)
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}
