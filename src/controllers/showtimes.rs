use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::middleware::AdminUser;
use crate::models::{Hall, Showtime};
use crate::seatmap::{self, ProjectedSeat, SeatLabel};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/showtimes", get(list_showtimes))
        .route("/showtimes", post(create_showtime))
        .route("/showtimes/{id}", get(get_showtime))
        .route("/showtimes/{id}/seats", get(get_seat_map))
}

/* ---------- catalog ---------- */

#[derive(Debug, Deserialize)]
struct ShowtimesQuery {
    movie_id: Option<i64>,
}

// GET /api/showtimes?movie_id=
async fn list_showtimes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShowtimesQuery>,
) -> Result<Json<Vec<Showtime>>> {
    let showtimes: Vec<Showtime> = match params.movie_id {
        Some(movie_id) => {
            sqlx::query_as(
                "SELECT id, movie_id, hall_id, show_date, show_time, ticket_price, created_at
                 FROM showtimes WHERE movie_id = $1
                 ORDER BY show_date, show_time",
            )
            .bind(movie_id)
            .fetch_all(&state.db.pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, movie_id, hall_id, show_date, show_time, ticket_price, created_at
                 FROM showtimes
                 ORDER BY show_date, show_time",
            )
            .fetch_all(&state.db.pool)
            .await?
        }
    };

    Ok(Json(showtimes))
}

// GET /api/showtimes/{id}
async fn get_showtime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Showtime>> {
    let showtime: Option<Showtime> = sqlx::query_as(
        "SELECT id, movie_id, hall_id, show_date, show_time, ticket_price, created_at
         FROM showtimes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?;

    showtime.map(Json).ok_or(Error::NotFound("showtime"))
}

// POST /api/showtimes
#[derive(Debug, Deserialize)]
struct CreateShowtimeRequest {
    movie_id: i64,
    hall_id: i64,
    show_date: NaiveDate,
    show_time: NaiveTime,
    ticket_price: Decimal,
}

async fn create_showtime(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateShowtimeRequest>,
) -> Result<impl IntoResponse> {
    let inserted = sqlx::query_as::<_, Showtime>(
        r#"
        INSERT INTO showtimes (movie_id, hall_id, show_date, show_time, ticket_price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, movie_id, hall_id, show_date, show_time, ticket_price, created_at
        "#,
    )
    .bind(req.movie_id)
    .bind(req.hall_id)
    .bind(req.show_date)
    .bind(req.show_time)
    .bind(req.ticket_price)
    .fetch_one(&state.db.pool)
    .await;

    match inserted {
        Ok(showtime) => Ok((StatusCode::CREATED, Json(showtime))),
        Err(e) if is_foreign_key_violation(&e) => Err(Error::NotFound("movie or hall")),
        Err(e) => Err(e.into()),
    }
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/* ---------- seat map ---------- */

#[derive(Debug, Deserialize)]
struct SeatMapQuery {
    /// Comma-separated labels of the caller's pending selection, e.g.
    /// "A1,B2". Purely presentational: the projection marks them `selected`
    /// unless someone already booked them.
    selected: Option<String>,
}

#[derive(Debug, Serialize)]
struct SeatMapResponse {
    showtime_id: i64,
    seats: Vec<ProjectedSeat>,
}

// GET /api/showtimes/{id}/seats?selected=A1,B2
async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<SeatMapQuery>,
) -> Result<Json<SeatMapResponse>> {
    let hall: Option<Hall> = sqlx::query_as(
        r#"
        SELECT h.id, h.name, h.layout
        FROM showtimes s
        JOIN halls h ON h.id = s.hall_id
        WHERE s.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?;
    let hall = hall.ok_or(Error::NotFound("showtime"))?;

    let reserved = state.cache.get_reserved(id).await?;

    let pending: HashSet<SeatLabel> = params
        .selected
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.is_empty())
        .map(SeatLabel::from)
        .collect();

    let seats = seatmap::project(&hall.layout, &reserved, &pending)?;

    Ok(Json(SeatMapResponse { showtime_id: id, seats }))
}
