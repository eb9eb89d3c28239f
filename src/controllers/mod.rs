pub mod bookings;
pub mod halls;
pub mod live;
pub mod movies;
pub mod showtimes;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(halls::routes())
        .merge(showtimes::routes())
        .merge(bookings::routes())
        .merge(live::routes())
}
