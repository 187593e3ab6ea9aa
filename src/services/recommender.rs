use std::sync::Arc;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::ScoredTitle,
};

/// Nearest-neighbor lookup over the precomputed similarity matrix
#[derive(Debug, Clone)]
pub struct Recommender {
    store: Arc<CatalogStore>,
}

impl Recommender {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Returns the `k` titles most similar to `query`, best first
    ///
    /// Candidates are ordered by score descending, then by catalog index
    /// ascending. The query itself is removed by index, never by score, so the
    /// result always holds `min(k, N - 1)` titles.
    pub fn recommend(&self, query: &str, k: usize) -> AppResult<Vec<ScoredTitle>> {
        if k == 0 {
            return Err(AppError::InvalidInput(
                "Number of recommendations must be at least 1".to_string(),
            ));
        }

        let index = self
            .store
            .resolve_index(query)
            .ok_or_else(|| AppError::UnknownTitle(query.to_string()))?;

        let mut ranked: Vec<(usize, f64)> = self
            .store
            .similarity_row(index)
            .iter()
            .copied()
            .enumerate()
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let recommendations: Vec<ScoredTitle> = ranked
            .into_iter()
            .filter(|&(candidate, _)| candidate != index)
            .take(k)
            .map(|(candidate, score)| ScoredTitle {
                title: self.store.title_at(candidate).clone(),
                score,
            })
            .collect();

        tracing::debug!(
            query = %query,
            index,
            requested = k,
            returned = recommendations.len(),
            "Ranked candidates"
        );

        Ok(recommendations)
    }
}
