use serde::{Deserialize, Serialize};

pub mod title;

pub use title::{CatalogRecord, Title};

/// How recommendations without a resolved poster are presented
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PosterPolicy {
    /// Keep the entry with no poster URL so the list stays at the requested size
    #[default]
    Keep,
    /// Remove entries without a poster
    Drop,
}

/// A ranked title with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTitle {
    pub title: Title,
    pub score: f64,
}

/// A single recommendation returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedTitle {
    pub id: u64,
    pub title: String,
    pub index: usize,
    pub score: f64,
    /// `None` when no poster could be resolved
    pub poster_url: Option<String>,
}

/// Response body for a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub query: String,
    pub requested: usize,
    pub recommendations: Vec<RecommendedTitle>,
    /// Diagnostics from poster lookups that failed
    pub warnings: Vec<String>,
    /// Notice shown when there is nothing to display
    pub message: Option<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `/movie/{id}` response we care about
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}
