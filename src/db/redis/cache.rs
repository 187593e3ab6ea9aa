use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// How long a resolved poster URL stays cached (1 week)
pub const POSTER_CACHE_TTL: u64 = 604800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Poster URL for a catalog movie id
    Poster(u64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Poster(movie_id) => write!(f, "poster:{}", movie_id),
        }
    }
}

/// Creates a Redis client for caching
///
/// Opening the client does not connect; connections are made per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Poster cache backed by Redis
///
/// Reads go straight to Redis; writes are queued to a background task so a
/// slow cache never delays a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
    /// Upper bound on a single Redis round trip, connection included
    op_timeout: Duration,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer to flush queued writes and waits for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
        tracing::info!("Cache writer stopped");
    }
}

impl Cache {
    /// Creates a cache and spawns its background writer
    ///
    /// Every read and write gives up after `op_timeout`. Must be called from
    /// within a tokio runtime.
    pub fn new(redis_client: Client, op_timeout: Duration) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx, op_timeout).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
            op_timeout,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
        op_timeout: Duration,
    ) {
        tracing::debug!("Cache writer task started");

        loop {
            tokio::select! {
                msg = write_rx.recv() => {
                    let Some(msg) = msg else { break };
                    if let Err(e) = Self::write_to_redis(&client, msg, op_timeout).await {
                        tracing::warn!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Senders live as long as any Cache clone, so drain what is
                    // queued instead of waiting for the channel to close.
                    let mut flushed = 0usize;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg, op_timeout).await {
                            tracing::warn!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }
                    tracing::info!(flushed, "Cache writer flushed pending writes");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(
        client: &Client,
        msg: CacheWriteMessage,
        op_timeout: Duration,
    ) -> AppResult<()> {
        with_timeout(op_timeout, async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
            Ok::<_, AppError>(())
        })
        .await
    }

    /// Retrieves and deserializes a cached value, `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = with_timeout(self.op_timeout, async {
            let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
            Ok::<Option<String>, AppError>(conn.get(key.to_string()).await?)
        })
        .await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

async fn with_timeout<T>(
    op_timeout: Duration,
    op: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    tokio::time::timeout(op_timeout, op).await.map_err(|_| {
        AppError::Internal(format!("Redis operation timed out after {:?}", op_timeout))
    })?
}
