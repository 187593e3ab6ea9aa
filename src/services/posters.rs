use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::{
    db::{redis::POSTER_CACHE_TTL, Cache, CacheKey},
    services::providers::PosterProvider,
};

/// Outcome of resolving one poster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterLookup {
    Found(String),
    /// The provider has no poster, or no provider is configured
    Absent,
    /// The lookup failed; treated as absent for display
    Failed(String),
}

impl PosterLookup {
    pub fn url(&self) -> Option<&str> {
        match self {
            PosterLookup::Found(url) => Some(url),
            PosterLookup::Absent | PosterLookup::Failed(_) => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            PosterLookup::Found(url) => Some(url),
            PosterLookup::Absent | PosterLookup::Failed(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            PosterLookup::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Resolves catalog ids to poster URLs without ever failing a request
///
/// Errors from the provider are contained in [`PosterLookup::Failed`]. The
/// cache read and the provider call are each bounded by `lookup_timeout`.
pub struct PosterResolver {
    provider: Option<Arc<dyn PosterProvider>>,
    cache: Option<Cache>,
    concurrency: usize,
    lookup_timeout: Duration,
}

impl PosterResolver {
    pub fn new(
        provider: Option<Arc<dyn PosterProvider>>,
        cache: Option<Cache>,
        concurrency: usize,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            concurrency: concurrency.max(1),
            lookup_timeout,
        }
    }

    /// A resolver that reports every poster as absent
    pub fn disabled() -> Self {
        Self::new(None, None, 1, Duration::from_secs(1))
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolves a single poster
    pub async fn resolve(&self, movie_id: u64) -> PosterLookup {
        let Some(provider) = &self.provider else {
            return PosterLookup::Absent;
        };

        let key = CacheKey::Poster(movie_id);
        if let Some(cache) = &self.cache {
            let read = tokio::time::timeout(
                self.lookup_timeout,
                cache.get_from_cache::<String>(&key),
            );
            match read.await {
                Ok(Ok(Some(url))) => {
                    tracing::debug!(movie_id, "Poster cache hit");
                    return PosterLookup::Found(url);
                }
                Ok(Ok(None)) => tracing::debug!(movie_id, "Poster cache miss"),
                Ok(Err(e)) => tracing::warn!(movie_id, error = %e, "Poster cache read failed"),
                Err(_) => tracing::warn!(movie_id, "Poster cache read timed out"),
            }
        }

        let fetch = tokio::time::timeout(self.lookup_timeout, provider.fetch_poster_url(movie_id));
        let Ok(fetched) = fetch.await else {
            tracing::warn!(
                movie_id,
                provider = provider.name(),
                timeout_ms = self.lookup_timeout.as_millis() as u64,
                "Poster lookup timed out"
            );
            return PosterLookup::Failed(format!(
                "poster lookup failed for movie {}: timed out after {:?}",
                movie_id, self.lookup_timeout
            ));
        };

        match fetched {
            Ok(Some(url)) => {
                if let Some(cache) = &self.cache {
                    cache.set_in_background(&key, &url, POSTER_CACHE_TTL);
                }
                PosterLookup::Found(url)
            }
            Ok(None) => PosterLookup::Absent,
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    provider = provider.name(),
                    error = %e,
                    "Poster lookup failed"
                );
                PosterLookup::Failed(format!("poster lookup failed for movie {}: {}", movie_id, e))
            }
        }
    }

    /// Resolves posters concurrently, returning outcomes in input order
    ///
    /// At most `concurrency` lookups are in flight. A task that panics yields
    /// `Failed` for its own item only.
    pub async fn resolve_all(self: &Arc<Self>, movie_ids: &[u64]) -> Vec<PosterLookup> {
        if !self.is_enabled() {
            return vec![PosterLookup::Absent; movie_ids.len()];
        }

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = Vec::with_capacity(movie_ids.len());

        for &movie_id in movie_ids {
            let resolver = Arc::clone(self);
            let permits = Arc::clone(&permits);
            let task = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                resolver.resolve(movie_id).await
            });
            tasks.push((movie_id, task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (movie_id, task) in tasks {
            match task.await {
                Ok(lookup) => results.push(lookup),
                Err(e) => {
                    tracing::error!(movie_id, error = %e, "Poster task join error");
                    results.push(PosterLookup::Failed(format!(
                        "poster lookup failed for movie {}: {}",
                        movie_id, e
                    )));
                }
            }
        }

        let failed = results.iter().filter(|r| r.diagnostic().is_some()).count();
        if failed > 0 {
            tracing::warn!(
                requested = movie_ids.len(),
                failed,
                "Partial poster lookup failure"
            );
        }

        results
    }
}
