use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use watchcraft::{
    config::Config,
    db::{create_redis_client, Cache, CatalogStore},
    routes::{create_router, AppState, RecommendationSettings},
    services::{
        providers::{PosterProvider, TmdbProvider},
        PosterResolver,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchcraft=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Nothing can be served without the catalog
    let store = CatalogStore::load(&config.catalog_path, &config.similarity_path)
        .context("Failed to load catalog artifacts")?;

    let provider: Option<Arc<dyn PosterProvider>> = match &config.tmdb_api_key {
        Some(api_key) if !api_key.trim().is_empty() => Some(Arc::new(TmdbProvider::new(
            api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_url.clone(),
            Duration::from_secs(config.poster_timeout_secs),
        )?)),
        _ => {
            tracing::warn!("TMDB_API_KEY not set, posters will not be resolved");
            None
        }
    };

    let (cache, cache_handle) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(
                create_redis_client(redis_url)?,
                Duration::from_secs(config.poster_timeout_secs),
            );
            tracing::info!("Poster cache enabled");
            (Some(cache), Some(handle))
        }
        None => (None, None),
    };

    let posters = Arc::new(PosterResolver::new(
        provider,
        cache,
        config.poster_concurrency,
        Duration::from_secs(config.poster_timeout_secs),
    ));

    let state = Arc::new(AppState::new(
        Arc::new(store),
        posters,
        RecommendationSettings::from(&config),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
