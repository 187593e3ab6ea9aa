use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::RecommendationResponse,
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    // Malformed parameters get the same JSON error body as every other failure
    let Query(params) = query.map_err(|rejection| {
        tracing::debug!(request_id = %request_id, error = %rejection, "Rejected query string");
        AppError::InvalidInput(rejection.body_text())
    })?;
    let settings = state.settings;

    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("title cannot be empty".to_string()));
    }

    let count = params.count.unwrap_or(settings.default_count);
    if !(settings.min_count..=settings.max_count).contains(&count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between {} and {}",
            settings.min_count, settings.max_count
        )));
    }

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        count,
        "Processing recommendation request"
    );

    let response = recommendations::get_recommendations(
        &state.recommender,
        &state.posters,
        &params.title,
        count,
        settings.poster_policy,
    )
    .await?;

    Ok(Json(response))
}
