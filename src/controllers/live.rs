use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/showtimes/{id}/live", get(live_feed))
}

// GET /api/showtimes/{id}/live — upgrades to a WebSocket that pushes a
// signal whenever the showtime's reserved-seat set changes. The message is
// a hint, not a delta: on receipt the client must re-fetch the seat map.
// There is no replay; a client that reconnects gets a new subscription and
// must do a full refresh first.
async fn live_feed(
    State(state): State<Arc<AppState>>,
    Path(showtime_id): Path<i64>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, showtime_id))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, showtime_id: i64) {
    let (mut sender, mut receiver) = socket.split();
    let mut sub = state.feed.subscribe(showtime_id).await;
    debug!(showtime_id, "live feed viewer connected");

    loop {
        tokio::select! {
            signal = sub.changed() => {
                let Some(signal) = signal else { break };
                let Ok(msg) = serde_json::to_string(&signal) else { break };
                if sender.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Pings are answered by axum; other client chatter is ignored.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!(showtime_id, "live feed viewer disconnected");
}
