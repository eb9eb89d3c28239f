use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::seatmap::HallLayout;

/// A physical hall. The layout is immutable once created; showtimes
/// reference the hall by id.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub name: String,
    pub layout: Json<HallLayout>,
}
