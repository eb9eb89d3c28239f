use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One screening of a movie in a hall. Seats are scoped per showtime: the
/// same physical seat is independently bookable across showtimes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Showtime {
    pub id: i64,
    pub movie_id: i64,
    pub hall_id: i64,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub ticket_price: Decimal,
    pub created_at: DateTime<Utc>,
}
