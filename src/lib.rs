pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod seatmap;
pub mod services;

use std::sync::Arc;
use tokio::task;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub feed: Arc<feed::FeedHub>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;
        let cache = cache::CacheService::new(redis.clone(), db.clone());
        let feed = Arc::new(feed::FeedHub::new());
        let state = Arc::new(Self {
            db,
            redis,
            cache,
            feed,
            config,
        });

        // Warm the catalog cache in the background
        let state_for_bg = state.clone();
        task::spawn(async move {
            state_for_bg.cache.warmup_cache().await;
        });

        Ok(state)
    }
}
