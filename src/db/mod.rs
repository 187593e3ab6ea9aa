pub mod catalog;
pub mod redis;

pub use self::catalog::{CatalogError, CatalogStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
