//! Subscriber registry and event fan-out.
//!
//! # Responsibilities
//! - Track every currently-open event stream
//! - Push each published event to all of them, in publish order
//! - Prune subscribers whose connection has gone away
//!
//! # Design Decisions
//! - `DashMap` keyed by an opaque UUID handle; the hub owns the set of
//!   subscribers, never their connection lifetime
//! - Publish iterates a snapshot of handles so concurrent unsubscribes
//!   cannot invalidate the iteration
//! - A failed send means the receiver is gone: remove it and keep going

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use dashmap::DashMap;
use futures_util::stream::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::broadcast::events::BroadcastEvent;

/// Fan-out hub for server-sent events.
#[derive(Default)]
pub struct BroadcastHub {
    subscribers: DashMap<Uuid, mpsc::UnboundedSender<Bytes>>,
    // Serializes publishes so every subscriber sees events in the same order.
    publish_lock: Mutex<()>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. The returned subscription unregisters
    /// itself when dropped.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);

        tracing::debug!(subscriber = %id, total = self.subscribers.len(), "Subscriber connected");

        Subscription {
            id,
            rx,
            hub: Arc::clone(self),
        }
    }

    /// Remove a subscriber by handle. Removing an unknown handle is a no-op.
    pub fn unsubscribe(&self, id: Uuid) {
        if self.subscribers.remove(&id).is_some() {
            tracing::debug!(subscriber = %id, total = self.subscribers.len(), "Subscriber removed");
        }
    }

    /// Number of currently-registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Serialize the event once and write it to every subscriber.
    ///
    /// Returns the number of subscribers the event was delivered to.
    /// Publishing with zero subscribers succeeds and returns 0.
    pub fn publish(&self, event: &BroadcastEvent) -> usize {
        let frame = match event.sse_frame() {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize broadcast event");
                return 0;
            }
        };

        let _order = self.publish_lock.lock().unwrap_or_else(|e| e.into_inner());

        // Snapshot the handles; subscribers may come and go mid-publish.
        let ids: Vec<Uuid> = self.subscribers.iter().map(|entry| *entry.key()).collect();

        let mut delivered = 0;
        for id in ids {
            let Some(tx) = self.subscribers.get(&id).map(|entry| entry.value().clone()) else {
                continue;
            };
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                // Receiver dropped: the connection is gone.
                self.subscribers.remove(&id);
                tracing::debug!(subscriber = %id, "Pruned dead subscriber during publish");
            }
        }

        delivered
    }
}

/// A live registration with the hub.
///
/// Holds the receiving half of the subscriber's channel; dropping it (which
/// happens when the HTTP response stream is dropped on disconnect) removes
/// the registration.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<Bytes>,
    hub: Arc<BroadcastHub>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive the next frame. `None` once the hub has dropped the sender.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Convert into a stream of frames suitable for an SSE response body.
    ///
    /// The stream owns the subscription, so dropping the response body
    /// unsubscribes from the hub.
    pub fn into_frame_stream(self) -> impl Stream<Item = Bytes> + Send + 'static {
        futures_util::stream::unfold(self, |mut sub| async move {
            sub.rx.recv().await.map(|frame| (frame, sub))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_event() -> BroadcastEvent {
        BroadcastEvent::LiveDemoStop
    }

    #[tokio::test]
    async fn publish_with_no_subscribers_succeeds() {
        let hub = Arc::new(BroadcastHub::new());
        assert_eq!(hub.publish(&stop_event()), 0);
    }

    #[tokio::test]
    async fn delivers_to_all_subscribers_in_order() {
        let hub = Arc::new(BroadcastHub::new());
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.publish(&BroadcastEvent::LiveDemoUpdate { code: "1".into() });
        hub.publish(&BroadcastEvent::LiveDemoUpdate { code: "2".into() });

        for sub in [&mut a, &mut b] {
            let first = sub.recv().await.unwrap();
            let second = sub.recv().await.unwrap();
            assert!(std::str::from_utf8(&first).unwrap().contains("\"code\":\"1\""));
            assert!(std::str::from_utf8(&second).unwrap().contains("\"code\":\"2\""));
        }
    }

    #[tokio::test]
    async fn dead_subscriber_is_pruned_without_blocking_others() {
        let hub = Arc::new(BroadcastHub::new());

        // A registration whose receiving half is already gone, registered
        // before the healthy subscriber.
        let dead_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        hub.subscribers.insert(dead_id, tx);
        drop(rx);

        let mut healthy = hub.subscribe();

        assert_eq!(hub.publish(&stop_event()), 1);
        assert!(healthy.recv().await.is_some());
        assert!(!hub.subscribers.contains_key(&dead_id));
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn dropping_subscription_unsubscribes() {
        let hub = Arc::new(BroadcastHub::new());
        let sub = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
