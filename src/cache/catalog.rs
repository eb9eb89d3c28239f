use redis::AsyncCommands;

use crate::cache::CacheService;
use crate::models::Movie;

const MOVIES_KEY: &str = "movies";
const MOVIES_TTL_SECS: u64 = 3600;

impl CacheService {
    /// Movie catalog, cache first, DB on miss. Returns an empty list when
    /// both are unreachable so browsing degrades instead of erroring.
    pub async fn get_movies(&self) -> Vec<Movie> {
        if let Ok(movies) = self.get_movies_from_cache().await {
            return movies;
        }

        if let Ok(movies) = self.load_movies_from_db().await {
            let _ = self.save_movies_to_cache(&movies).await;
            return movies;
        }

        vec![]
    }

    /// Called after an admin adds a movie.
    pub async fn invalidate_movies(&self) {
        let mut conn = self.redis.conn.clone();
        let _: Result<(), _> = conn.del(MOVIES_KEY).await;
    }

    async fn load_movies_from_db(&self) -> Result<Vec<Movie>, sqlx::Error> {
        sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, poster_url, duration_min, created_at
             FROM movies
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.db.pool)
        .await
    }

    async fn get_movies_from_cache(&self) -> Result<Vec<Movie>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: String = conn.get(MOVIES_KEY).await?;
        let movies: Vec<Movie> = serde_json::from_str(&data)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error")))?;
        Ok(movies)
    }

    async fn save_movies_to_cache(&self, movies: &[Movie]) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(movies)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error")))?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(MOVIES_KEY, data, MOVIES_TTL_SECS).await
    }
}
