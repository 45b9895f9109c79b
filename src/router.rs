use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{JwtError, TokenIssuer};
use crate::config::AppConfig;
use crate::database::{HealthCheck, MovieStore, ReviewStore, UserStore};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenIssuer,
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Build state around a single backend serving all three collections
    pub fn new<S>(config: AppConfig, store: Arc<S>) -> Result<Self, JwtError>
    where
        S: UserStore + MovieStore + ReviewStore + HealthCheck + 'static,
    {
        let tokens = TokenIssuer::new(&config.security)?;

        Ok(Self {
            config: Arc::new(config),
            tokens,
            users: store.clone(),
            movies: store.clone(),
            reviews: store.clone(),
            health: store,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.api.request_timeout_secs);
    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", any(public::route_not_supported))
        .route("/health", get(public::health))
        .route("/signup", post(public::signup))
        .route("/signin", post(public::signin))
        // Protected
        .merge(movie_routes(state.clone()))
        .merge(review_routes(state.clone()))
        // Global middleware
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(state);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn movie_routes(state: AppState) -> Router<AppState> {
    use protected::movies;

    let auth = middleware::from_fn_with_state(state, jwt_auth_middleware);

    Router::new()
        .route(
            "/movies",
            get(movies::movies_get)
                .post(movies::movies_post)
                .put(movies::movies_put)
                .delete(movies::movies_delete)
                // The guard wraps only the methods above; unsupported methods fall through unauthenticated
                .route_layer(auth.clone())
                .fallback(movies::movies_method_not_supported),
        )
        .route("/movies/:movie_id", get(movies::movie_get).route_layer(auth))
}

fn review_routes(state: AppState) -> Router<AppState> {
    use protected::reviews;

    Router::new()
        .route("/reviews", get(reviews::reviews_get).post(reviews::reviews_post))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
