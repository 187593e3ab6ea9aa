use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    /// Case-insensitive substring filter
    #[serde(default)]
    q: Option<String>,
}

/// Lists selectable title names in catalog order
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleQuery>,
) -> Json<Vec<String>> {
    let needle = params
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let titles = state
        .store()
        .all_titles()
        .filter(|name| match &needle {
            Some(needle) => name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .map(str::to_string)
        .collect();

    Json(titles)
}
