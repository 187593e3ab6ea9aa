use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::CatalogStore,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::PosterPolicy,
    services::{PosterResolver, Recommender},
};

pub mod recommendations;
pub mod titles;

/// Limits applied to the requested number of recommendations
#[derive(Debug, Clone, Copy)]
pub struct RecommendationSettings {
    pub default_count: usize,
    pub min_count: usize,
    pub max_count: usize,
    pub poster_policy: PosterPolicy,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_count: 5,
            min_count: 3,
            max_count: 10,
            poster_policy: PosterPolicy::Keep,
        }
    }
}

impl From<&Config> for RecommendationSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_count: config.default_recommendations,
            min_count: config.min_recommendations,
            max_count: config.max_recommendations,
            poster_policy: config.poster_policy,
        }
    }
}

/// Shared, read-only application state
pub struct AppState {
    pub recommender: Recommender,
    pub posters: Arc<PosterResolver>,
    pub settings: RecommendationSettings,
}

impl AppState {
    pub fn new(
        store: Arc<CatalogStore>,
        posters: Arc<PosterResolver>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            recommender: Recommender::new(store),
            posters,
            settings,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        self.recommender.store()
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles", get(titles::list))
        .route("/recommendations", get(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "titles": state.store().len() })),
    )
}
