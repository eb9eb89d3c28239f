use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
}
