use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::middleware::AdminUser;
use crate::models::Hall;
use crate::seatmap::HallLayout;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/halls", post(create_hall))
        .route("/halls/{id}", get(get_hall))
}

// GET /api/halls/{id}
async fn get_hall(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Hall>> {
    let hall: Option<Hall> = sqlx::query_as("SELECT id, name, layout FROM halls WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db.pool)
        .await?;

    hall.map(Json).ok_or(Error::NotFound("hall"))
}

// POST /api/halls
#[derive(Debug, Deserialize)]
struct CreateHallRequest {
    name: String,
    layout: HallLayout,
}

async fn create_hall(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateHallRequest>,
) -> Result<impl IntoResponse> {
    // Layouts are immutable once stored; a malformed one must never get in.
    req.layout.validate()?;

    let hall: Hall = sqlx::query_as(
        "INSERT INTO halls (name, layout) VALUES ($1, $2) RETURNING id, name, layout",
    )
    .bind(&req.name)
    .bind(Jsonb(&req.layout))
    .fetch_one(&state.db.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(hall)))
}
