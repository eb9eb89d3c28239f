//! Live availability feed: tells every viewer of a showtime that its
//! reserved-seat set changed. The signal carries no delta — receivers must
//! re-fetch the authoritative reserved set, because notifications may be
//! coalesced, reordered, or dropped. The feed is an optimization, not a
//! correctness mechanism: if it fails, viewers see a stale map until they
//! refresh.

use serde::Serialize;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Postgres channel fed by the seat_reservations trigger.
pub const PG_CHANNEL: &str = "seat_reservations_changed";

const CHANNEL_CAPACITY: usize = 16;

/// Signal payload: only "something changed for this showtime". Serializes
/// as the wire message sent to live-feed viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "reservations_changed")]
pub struct SeatMapChanged {
    pub showtime_id: i64,
}

/// Per-showtime broadcast registry. One channel per showtime with at least
/// one subscriber; channels without receivers are pruned on notify.
#[derive(Default)]
pub struct FeedHub {
    channels: RwLock<HashMap<i64, broadcast::Sender<SeatMapChanged>>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a viewer of the given showtime. Delivery stops when the
    /// returned subscription is dropped.
    pub async fn subscribe(&self, showtime_id: i64) -> FeedSubscription {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(showtime_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        FeedSubscription {
            showtime_id,
            rx: tx.subscribe(),
        }
    }

    /// Fans the change signal out to current subscribers of the showtime.
    /// Nobody listening is not an error.
    pub async fn notify(&self, showtime_id: i64) {
        let mut channels = self.channels.write().await;
        if let Some(tx) = channels.get(&showtime_id) {
            if tx.receiver_count() == 0 {
                channels.remove(&showtime_id);
                return;
            }
            let _ = tx.send(SeatMapChanged { showtime_id });
        }
    }

    #[cfg(test)]
    async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

/// One viewer's handle on a showtime's change signals.
pub struct FeedSubscription {
    showtime_id: i64,
    rx: broadcast::Receiver<SeatMapChanged>,
}

impl FeedSubscription {
    pub fn showtime_id(&self) -> i64 {
        self.showtime_id
    }

    /// Waits for the next change signal. A lagged receiver gets a fresh
    /// signal instead of the missed ones (coalescing is allowed by the feed
    /// contract). `None` means the hub side is gone; the caller should
    /// re-subscribe and do a full refresh.
    pub async fn changed(&mut self) -> Option<SeatMapChanged> {
        match self.rx.recv().await {
            Ok(signal) => Some(signal),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                debug!(
                    showtime_id = self.showtime_id,
                    missed, "feed receiver lagged, coalescing"
                );
                Some(SeatMapChanged { showtime_id: self.showtime_id })
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Bridges Postgres NOTIFY into the hub. The seat_reservations trigger emits
/// the showtime id as the notification payload on every insert or delete.
/// Connection loss degrades the feed to "stale until refresh": we log, back
/// off, and reconnect; there is no replay of missed notifications.
pub async fn run_listener(pool: PgPool, hub: Arc<FeedHub>) {
    loop {
        match PgListener::connect_with(&pool).await {
            Ok(mut listener) => {
                if let Err(e) = listener.listen(PG_CHANNEL).await {
                    warn!("feed listener failed to LISTEN: {e:?}");
                } else {
                    info!("feed listener attached to {PG_CHANNEL}");
                    loop {
                        match listener.recv().await {
                            Ok(notification) => {
                                match notification.payload().parse::<i64>() {
                                    Ok(showtime_id) => hub.notify(showtime_id).await,
                                    Err(_) => warn!(
                                        "feed notification with bad payload: {:?}",
                                        notification.payload()
                                    ),
                                }
                            }
                            Err(e) => {
                                warn!("feed listener connection lost: {e:?}");
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => warn!("feed listener failed to connect: {e:?}"),
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn subscriber_receives_change_signal() {
        let hub = FeedHub::new();
        let mut sub = hub.subscribe(7).await;

        hub.notify(7).await;

        let signal = timeout(Duration::from_secs(1), sub.changed())
            .await
            .expect("signal within deadline")
            .expect("hub still open");
        assert_eq!(signal, SeatMapChanged { showtime_id: 7 });
    }

    #[tokio::test]
    async fn all_viewers_of_a_showtime_are_notified() {
        let hub = FeedHub::new();
        let mut a = hub.subscribe(1).await;
        let mut b = hub.subscribe(1).await;

        hub.notify(1).await;

        assert!(timeout(Duration::from_secs(1), a.changed()).await.unwrap().is_some());
        assert!(timeout(Duration::from_secs(1), b.changed()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn signals_are_scoped_per_showtime() {
        let hub = FeedHub::new();
        let mut other = hub.subscribe(2).await;

        hub.notify(1).await;
        hub.notify(2).await;

        let signal = timeout(Duration::from_secs(1), other.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.showtime_id, 2);
    }

    #[tokio::test]
    async fn dropping_subscription_stops_delivery_and_prunes() {
        let hub = FeedHub::new();
        let sub = hub.subscribe(3).await;
        drop(sub);

        // Next notify sees no receivers and drops the channel.
        hub.notify(3).await;
        assert_eq!(hub.channel_count().await, 0);
    }

    #[test]
    fn signal_serializes_as_the_wire_message() {
        let signal = SeatMapChanged { showtime_id: 5 };
        assert_eq!(
            serde_json::to_value(signal).unwrap(),
            serde_json::json!({ "type": "reservations_changed", "showtime_id": 5 })
        );
    }

    #[tokio::test]
    async fn notify_without_subscribers_is_harmless() {
        let hub = FeedHub::new();
        hub.notify(42).await;
        assert_eq!(hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn lagged_receiver_gets_coalesced_signal() {
        let hub = FeedHub::new();
        let mut sub = hub.subscribe(5).await;

        // Overflow the channel so the receiver lags.
        for _ in 0..(CHANNEL_CAPACITY + 4) {
            hub.notify(5).await;
        }

        let signal = timeout(Duration::from_secs(1), sub.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.showtime_id, 5);
    }
}
