use serde::Deserialize;

use crate::models::PosterPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the serialized title list
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the serialized similarity matrix
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// TMDB API key. Posters are disabled when unset.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Per-lookup timeout for poster requests
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Maximum number of poster lookups in flight per request
    #[serde(default = "default_poster_concurrency")]
    pub poster_concurrency: usize,

    /// What to do with recommendations whose poster could not be resolved
    #[serde(default)]
    pub poster_policy: PosterPolicy,

    /// Redis connection URL for the poster cache. No cache when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    #[serde(default = "default_min_recommendations")]
    pub min_recommendations: usize,

    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> String {
    "artifacts/movie_list.json".to_string()
}

fn default_similarity_path() -> String {
    "artifacts/similarity.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    5
}

fn default_poster_concurrency() -> usize {
    4
}

fn default_recommendations() -> usize {
    5
}

fn default_min_recommendations() -> usize {
    3
}

fn default_max_recommendations() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the numeric settings for internal consistency
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_recommendations == 0 {
            anyhow::bail!("MIN_RECOMMENDATIONS must be at least 1");
        }
        if self.min_recommendations > self.max_recommendations {
            anyhow::bail!(
                "MIN_RECOMMENDATIONS ({}) exceeds MAX_RECOMMENDATIONS ({})",
                self.min_recommendations,
                self.max_recommendations
            );
        }
        if !(self.min_recommendations..=self.max_recommendations)
            .contains(&self.default_recommendations)
        {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS ({}) must lie within {}..={}",
                self.default_recommendations,
                self.min_recommendations,
                self.max_recommendations
            );
        }
        if self.poster_concurrency == 0 {
            anyhow::bail!("POSTER_CONCURRENCY must be at least 1");
        }
        if self.poster_timeout_secs == 0 {
            anyhow::bail!("POSTER_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_path, "artifacts/movie_list.json");
        assert_eq!(config.similarity_path, "artifacts/similarity.json");
        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.poster_policy, PosterPolicy::Keep);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.default_recommendations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("TMDB_API_KEY", "secret"),
            ("PORT", "8080"),
            ("POSTER_POLICY", "drop"),
            ("MAX_RECOMMENDATIONS", "20"),
        ]);
        assert_eq!(config.tmdb_api_key.as_deref(), Some("secret"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.poster_policy, PosterPolicy::Drop);
        assert_eq!(config.max_recommendations, 20);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let config = config_from(&[("MIN_RECOMMENDATIONS", "8"), ("MAX_RECOMMENDATIONS", "4")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_default_outside_range() {
        let config = config_from(&[("DEFAULT_RECOMMENDATIONS", "12")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = config_from(&[("POSTER_CONCURRENCY", "0")]);
        assert!(config.validate().is_err());
    }
}
