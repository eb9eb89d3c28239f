use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::task;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{config::Config, controllers, feed, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema booking API");

    let port = config.app.port;
    let app_state = AppState::new(config).await?;
    info!("Database connected, migrations applied");

    // --- Start background tasks ---

    // Bridge Postgres NOTIFY from the seat_reservations trigger into the
    // live availability feed.
    task::spawn(feed::run_listener(
        app_state.db.pool.clone(),
        app_state.feed.clone(),
    ));

    // --- Start the web server ---

    let app = Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
