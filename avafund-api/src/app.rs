//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use avafund_api::{app::{build_router, AppState}, config::Config};
//! use avafund_shared::store::InMemoryStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let state = AppState::new(Arc::new(InMemoryStore::new()), config);
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, error::ApiError, routes};
use avafund_shared::{auth::middleware::authenticate_bearer, store::LedgerStore};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Users, campaigns, milestones and donations
    pub store: Arc<dyn LedgerStore>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /health
/// └── /api/
///     ├── /auth/
///     │   ├── POST /signup
///     │   └── POST /login
///     ├── /campaigns/
///     │   ├── GET  /
///     │   ├── GET  /:id
///     │   ├── POST /              (bearer token)
///     │   └── POST /:id/donate    (bearer token)
///     └── /price/
///         └── GET  /avax-kes
/// ```
///
/// Layers, outermost first: CORS, request tracing, then bearer
/// authentication on the protected campaign routes only.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    let public_campaign_routes = Router::new()
        .route("/", get(routes::campaigns::list_campaigns))
        .route("/:id", get(routes::campaigns::get_campaign));

    // route_layer: unmatched paths still 404 instead of 401
    let protected_campaign_routes = Router::new()
        .route("/", post(routes::campaigns::create_campaign))
        .route("/:id/donate", post(routes::campaigns::donate))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    let price_routes = Router::new().route("/avax-kes", get(routes::price::avax_kes));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest(
            "/campaigns",
            public_campaign_routes.merge(protected_campaign_routes),
        )
        .nest("/price", price_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Validates the bearer token and inserts
/// [`AuthContext`](avafund_shared::auth::middleware::AuthContext) into
/// request extensions
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate_bearer(req.headers(), state.jwt_secret()).map_err(|err| {
        tracing::debug!(error = %err, path = %req.uri().path(), "Rejected request");
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
