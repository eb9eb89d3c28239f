use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::Booking;
use crate::seatmap::SeatLabel;
use crate::services::reservation;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(get_user_bookings))
        .route("/showtimes/{id}/bookings", post(create_booking))
}

// POST /api/showtimes/{id}/bookings
#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    seats: Vec<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(showtime_id): Path<i64>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse> {
    let requested: BTreeSet<SeatLabel> =
        req.seats.into_iter().map(SeatLabel::from).collect();

    let booking =
        reservation::create_booking(&state.db.pool, user.user_id, showtime_id, &requested)
            .await?;

    // The commit already fired the change-notification trigger; here we only
    // drop the cached reserved set so the next projection re-reads the store.
    state.cache.invalidate_reserved(showtime_id).await;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Booking>>> {
    let bookings: Vec<Booking> = sqlx::query_as(
        "SELECT id, user_id, showtime_id, seats, total_price, booking_status, created_at
         FROM bookings
         WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(bookings))
}
