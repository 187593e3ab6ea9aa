/// Poster data provider abstraction
///
/// Providers map a catalog movie id to a displayable poster URL. The only
/// implementation talks to TMDB, but the resolver works against this trait so
/// tests can substitute their own.
use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for poster providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Looks up the poster URL for a movie
    ///
    /// `Ok(None)` means the provider knows the movie but has no poster for it.
    /// Transport failures, bad statuses and malformed responses are errors.
    async fn fetch_poster_url(&self, movie_id: u64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
