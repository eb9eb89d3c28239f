use crate::{database::Database, redis_client::RedisClient};
use tracing::info;

pub mod catalog;
pub mod seats;

/// Cache-aside layer over redis: movie catalog and per-showtime reserved-seat
/// sets. The store stays authoritative; entries are invalidated after every
/// mutation and carry a TTL as a backstop, so a stale entry can only delay
/// the seat map, never corrupt a booking.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    db: Database,
}

impl CacheService {
    pub fn new(redis: RedisClient, db: Database) -> Self {
        Self { redis, db }
    }

    // Warm the catalog at startup so the first page load skips the DB.
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");
        let _ = self.get_movies().await;
        info!("Cache warmup done");
    }
}
