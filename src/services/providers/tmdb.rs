/// TMDB poster provider
///
/// Looks up `/movie/{id}` and turns the `poster_path` fragment into a full
/// image URL. A movie without a poster is a normal outcome, not an error.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::TmdbMovieDetails,
    services::providers::PosterProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url,
        })
    }
}

/// Joins the image base URL and a TMDB poster path
///
/// Returns `None` for an empty path.
pub fn compose_poster_url(image_url: &str, poster_path: &str) -> Option<String> {
    let path = poster_path.trim().trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("{}/{}", image_url.trim_end_matches('/'), path))
}

#[async_trait::async_trait]
impl PosterProvider for TmdbProvider {
    async fn fetch_poster_url(&self, movie_id: u64) -> AppResult<Option<String>> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let details: TmdbMovieDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(
                movie_id,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        let poster_url = details
            .poster_path
            .as_deref()
            .and_then(|path| compose_poster_url(&self.image_url, path));

        tracing::debug!(
            movie_id,
            found = poster_url.is_some(),
            provider = "tmdb",
            "Poster looked up"
        );

        Ok(poster_url)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
