use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{PosterPolicy, RecommendationResponse, RecommendedTitle},
    services::{posters::PosterResolver, recommender::Recommender},
};

/// Notice returned when nothing is left to display
pub const NO_RESULTS_MESSAGE: &str =
    "Couldn't generate recommendations for this movie. Please try another selection.";

/// Builds the recommendation payload for a selected title
///
/// Ranks similar titles, resolves their posters concurrently and applies the
/// missing-poster policy. An unknown title fails the whole request; a failed
/// poster only adds a warning.
pub async fn get_recommendations(
    recommender: &Recommender,
    posters: &Arc<PosterResolver>,
    query: &str,
    count: usize,
    policy: PosterPolicy,
) -> AppResult<RecommendationResponse> {
    let ranked = recommender.recommend(query, count)?;

    let movie_ids: Vec<u64> = ranked.iter().map(|r| r.title.id).collect();
    let lookups = posters.resolve_all(&movie_ids).await;

    let mut recommendations = Vec::with_capacity(ranked.len());
    let mut warnings = Vec::new();

    for (scored, lookup) in ranked.into_iter().zip(lookups) {
        if let Some(diagnostic) = lookup.diagnostic() {
            warnings.push(diagnostic.to_string());
        }

        let poster_url = lookup.into_url();
        if poster_url.is_none() && policy == PosterPolicy::Drop {
            tracing::debug!(
                movie_id = scored.title.id,
                title = %scored.title.name,
                "Dropping recommendation without poster"
            );
            continue;
        }

        recommendations.push(RecommendedTitle {
            id: scored.title.id,
            title: scored.title.name,
            index: scored.title.index,
            score: scored.score,
            poster_url,
        });
    }

    tracing::info!(
        query = %query,
        requested = count,
        returned = recommendations.len(),
        poster_failures = warnings.len(),
        "Recommendations generated"
    );

    let message = recommendations
        .is_empty()
        .then(|| NO_RESULTS_MESSAGE.to_string());

    Ok(RecommendationResponse {
        query: query.to_string(),
        requested: count,
        recommendations,
        warnings,
        message,
    })
}
