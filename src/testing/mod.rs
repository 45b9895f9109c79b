use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::models::{Movie, MovieWithReviews, NewMovie, NewReview, NewUser, Review, User};
use crate::database::{AggregateQuery, HealthCheck, MemoryStore, MovieStore, ReviewStore, StoreError, UserStore};
use crate::filter::ReviewFilter;
use crate::router::{build_router, AppState};

/// MemoryStore wrapper counting every store call
#[derive(Debug)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(4),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.tick();
        self.inner.create_user(user).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.tick();
        self.inner.find_user_by_username(username).await
    }

    async fn compare_password(&self, user: &User, candidate: &str) -> Result<bool, StoreError> {
        self.tick();
        self.inner.compare_password(user, candidate).await
    }
}

#[async_trait]
impl MovieStore for CountingStore {
    async fn create_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        self.tick();
        self.inner.create_movie(movie).await
    }

    async fn find_complete_movies(&self) -> Result<Vec<Movie>, StoreError> {
        self.tick();
        self.inner.find_complete_movies().await
    }

    async fn find_movie_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        self.tick();
        self.inner.find_movie_by_id(id).await
    }

    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        self.tick();
        self.inner.find_movie_by_title(title).await
    }

    async fn update_movie_title(&self, find_title: &str, update_title: &str) -> Result<Option<Movie>, StoreError> {
        self.tick();
        self.inner.update_movie_title(find_title, update_title).await
    }

    async fn delete_movie_by_title(&self, title: &str) -> Result<Option<Movie>, StoreError> {
        self.tick();
        self.inner.delete_movie_by_title(title).await
    }

    async fn aggregate_with_reviews(&self, query: AggregateQuery) -> Result<Vec<MovieWithReviews>, StoreError> {
        self.tick();
        self.inner.aggregate_with_reviews(query).await
    }
}

#[async_trait]
impl ReviewStore for CountingStore {
    async fn create_review(&self, review: NewReview) -> Result<Review, StoreError> {
        self.tick();
        self.inner.create_review(review).await
    }

    async fn find_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, StoreError> {
        self.tick();
        self.inner.find_reviews(filter).await
    }
}

#[async_trait]
impl HealthCheck for CountingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Router over a fresh counting store, driven in-process with `oneshot`
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<CountingStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "test-secret".to_string();
        config.security.password_hash_cost = 4;
        config.api.enable_request_logging = false;

        let store = Arc::new(CountingStore::new());
        let state = AppState::new(config, store.clone()).expect("test state");
        Self { state, store }
    }

    /// Send one request; returns the status and the JSON body (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = build_router(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Sign up and sign in, returning the full "JWT <token>" string
    pub async fn token_for(&self, username: &str) -> String {
        let credentials = json!({ "name": username, "username": username, "password": "pw-123" });
        let (status, body) = self.send(Method::POST, "/signup", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (status, body) = self.send(Method::POST, "/signin", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().expect("token").to_string()
    }

    /// Create a movie with three actors and return its id
    pub async fn create_movie(&self, token: &str, title: &str) -> Uuid {
        let payload = json!({
            "title": title,
            "releaseDate": "1995",
            "genre": "Crime",
            "actors": ["Al Pacino", "Robert De Niro", "Val Kilmer"]
        });
        let (status, body) = self.send(Method::POST, "/movies", Some(token), Some(payload)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["success"], true, "{}", body);

        self.store
            .inner()
            .find_movie_by_title(title)
            .await
            .unwrap()
            .expect("created movie")
            .id
    }
}
