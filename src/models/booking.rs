use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's purchase for one showtime. The `seats` list and the set of
/// seat_reservations rows referencing this booking always have identical
/// membership; both are written in the same transaction.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: i64,
    pub showtime_id: i64,
    pub seats: Vec<String>,
    pub total_price: Decimal,
    pub booking_status: String,
    pub created_at: DateTime<Utc>,
}
