use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::middleware::AdminUser;
use crate::models::Movie;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies", post(create_movie))
        .route("/movies/{id}", get(get_movie))
}

// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.cache.get_movies().await)
}

// GET /api/movies/{id}
async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>> {
    let movie: Option<Movie> = sqlx::query_as(
        "SELECT id, title, description, poster_url, duration_min, created_at
         FROM movies WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?;

    movie.map(Json).ok_or(Error::NotFound("movie"))
}

// POST /api/movies
#[derive(Debug, Deserialize)]
struct CreateMovieRequest {
    title: String,
    description: Option<String>,
    poster_url: Option<String>,
    duration_min: i32,
}

async fn create_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateMovieRequest>,
) -> Result<impl IntoResponse> {
    let movie: Movie = sqlx::query_as(
        r#"
        INSERT INTO movies (title, description, poster_url, duration_min)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, description, poster_url, duration_min, created_at
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.poster_url)
    .bind(req.duration_min)
    .fetch_one(&state.db.pool)
    .await?;

    state.cache.invalidate_movies().await;

    Ok((StatusCode::CREATED, Json(movie)))
}
