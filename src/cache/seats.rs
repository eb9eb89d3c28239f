use redis::AsyncCommands;
use std::collections::HashSet;

use crate::cache::CacheService;
use crate::error::Result;
use crate::seatmap::SeatLabel;

// Short TTL: the feed already tells viewers to re-fetch, the TTL only caps
// how long a missed invalidation can linger.
const RESERVED_TTL_SECS: u64 = 30;

fn reserved_key(showtime_id: i64) -> String {
    format!("reserved:{showtime_id}")
}

impl CacheService {
    /// The authoritative reserved-seat set for a showtime, cache first.
    /// Unlike the catalog this propagates DB errors: a wrong reserved set
    /// must not be silently rendered as an empty one.
    pub async fn get_reserved(&self, showtime_id: i64) -> Result<HashSet<SeatLabel>> {
        if let Ok(Some(reserved)) = self.get_reserved_from_cache(showtime_id).await {
            return Ok(reserved);
        }

        let labels: Vec<String> = sqlx::query_scalar(
            "SELECT seat_label FROM seat_reservations WHERE showtime_id = $1",
        )
        .bind(showtime_id)
        .fetch_all(&self.db.pool)
        .await?;

        let _ = self.save_reserved_to_cache(showtime_id, &labels).await;
        Ok(labels.into_iter().map(SeatLabel::from).collect())
    }

    /// Called after a committed booking changes the showtime's reservations.
    pub async fn invalidate_reserved(&self, showtime_id: i64) {
        let mut conn = self.redis.conn.clone();
        let _: std::result::Result<(), _> = conn.del(reserved_key(showtime_id)).await;
    }

    async fn get_reserved_from_cache(
        &self,
        showtime_id: i64,
    ) -> std::result::Result<Option<HashSet<SeatLabel>>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(reserved_key(showtime_id)).await?;
        let Some(data) = data else { return Ok(None) };
        let labels: Vec<String> = serde_json::from_str(&data)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error")))?;
        Ok(Some(labels.into_iter().map(SeatLabel::from).collect()))
    }

    async fn save_reserved_to_cache(
        &self,
        showtime_id: i64,
        labels: &[String],
    ) -> std::result::Result<(), redis::RedisError> {
        let data = serde_json::to_string(labels)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error")))?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(reserved_key(showtime_id), data, RESERVED_TTL_SECS).await
    }
}
