//! Per-subscriber event fan-out.
//!
//! Every observer owns an independent unbounded queue. `publish` enqueues to
//! all of them, so each subscriber sees every event in publish order exactly
//! once, and a slow observer can neither starve another nor block the
//! publisher. Dropping a [`Subscription`] removes its queue promptly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use benchwatch_types::BroadcastEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Registry {
    subscribers: Mutex<HashMap<u64, mpsc::UnboundedSender<BroadcastEvent>>>,
    next_id: AtomicU64,
}

/// Fan-out publisher for [`BroadcastEvent`]s.
///
/// Cheap to clone; all clones share one subscriber registry.
#[derive(Debug, Clone, Default)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    /// Create a broadcaster with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every current subscriber.
    ///
    /// Never blocks: each delivery is an unbounded enqueue. Subscribers
    /// whose receiving side has gone away are dropped from the registry.
    pub fn publish(&self, event: BroadcastEvent) {
        let mut subscribers = self.registry.subscribers.lock();
        subscribers.retain(|id, tx| {
            let alive = tx.send(event.clone()).is_ok();
            if !alive {
                debug!(subscriber = id, "dropping disconnected subscriber");
            }
            alive
        });
        trace!(subscribers = subscribers.len(), "event published");
    }

    /// Register a new subscriber.
    ///
    /// `snapshot` is evaluated under the registry lock and its events are
    /// enqueued before the subscriber becomes visible to `publish`, so a new
    /// observer sees settled state at subscription time plus all subsequent
    /// events, with nothing missed and nothing re-delivered.
    pub fn subscribe_with<I>(&self, snapshot: impl FnOnce() -> I) -> Subscription
    where
        I: IntoIterator<Item = BroadcastEvent>,
    {
        let mut subscribers = self.registry.subscribers.lock();
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        for event in snapshot() {
            // Receiver is held right here; the send cannot fail.
            let _ = tx.send(event);
        }
        subscribers.insert(id, tx);
        debug!(subscriber = id, "observer subscribed");

        Subscription {
            id,
            rx,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.subscribers.lock().len()
    }
}

/// What a subscriber receives from [`Subscription::next`].
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// A broadcast event.
    Event(BroadcastEvent),
    /// No event arrived within the keepalive interval. Transports forward
    /// this as a liveness probe to detect dead observers.
    KeepAlive,
}

/// One observer's end of the broadcast channel.
///
/// Dropping the subscription unsubscribes it: the registry entry is removed
/// and later publishes no longer enqueue to it. Events already delivered
/// remain readable until the subscription is dropped.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<BroadcastEvent>,
    registry: Arc<Registry>,
}

impl Subscription {
    /// Receive the next event, waiting as long as it takes.
    ///
    /// Returns `None` only after the subscription was unsubscribed out from
    /// under the receiver, which cannot happen while this handle is alive.
    pub async fn recv(&mut self) -> Option<BroadcastEvent> {
        self.rx.recv().await
    }

    /// Receive the next event, or a [`Delivery::KeepAlive`] if none arrives
    /// within `keepalive`.
    ///
    /// The delivery sequence never terminates on its own; a transport loop
    /// can call this forever and use the keepalives as liveness probes.
    pub async fn next(&mut self, keepalive: Duration) -> Delivery {
        match tokio::time::timeout(keepalive, self.rx.recv()).await {
            Ok(Some(event)) => Delivery::Event(event),
            Ok(None) => Delivery::KeepAlive,
            Err(_) => Delivery::KeepAlive,
        }
    }

    /// Take the next already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<BroadcastEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.subscribers.lock().remove(&self.id);
        debug!(subscriber = self.id, "observer unsubscribed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchwatch_types::TimelinePoint;

    fn tick(value: f64) -> BroadcastEvent {
        BroadcastEvent::Measurement {
            data: TimelinePoint {
                test: "t".to_string(),
                name: "unnamed".to_string(),
                value,
                unit: "V".to_string(),
                time: 0.0,
            },
        }
    }

    #[test]
    fn every_subscriber_sees_every_event_in_order() {
        let broadcaster = Broadcaster::new();
        let mut subs: Vec<_> = (0..4)
            .map(|_| broadcaster.subscribe_with(Vec::new))
            .collect();

        for i in 0..10 {
            broadcaster.publish(tick(i as f64));
        }

        for sub in &mut subs {
            for i in 0..10 {
                assert_eq!(sub.try_recv(), Some(tick(i as f64)));
            }
            assert_eq!(sub.try_recv(), None);
        }
    }

    #[test]
    fn late_subscriber_gets_snapshot_not_replay() {
        let broadcaster = Broadcaster::new();
        broadcaster.publish(tick(1.0));
        broadcaster.publish(tick(2.0));

        let mut sub = broadcaster.subscribe_with(|| vec![tick(99.0)]);
        broadcaster.publish(tick(3.0));

        // Snapshot burst first, then only events published after subscribing.
        assert_eq!(sub.try_recv(), Some(tick(99.0)));
        assert_eq!(sub.try_recv(), Some(tick(3.0)));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn drop_unsubscribes() {
        let broadcaster = Broadcaster::new();
        let sub = broadcaster.subscribe_with(Vec::new);
        let _other = broadcaster.subscribe_with(Vec::new);
        assert_eq!(broadcaster.subscriber_count(), 2);

        drop(sub);
        assert_eq!(broadcaster.subscriber_count(), 1);

        // Publishing after the drop must not panic or misroute.
        broadcaster.publish(tick(1.0));
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[test]
    fn publish_does_not_block_on_idle_subscriber() {
        let broadcaster = Broadcaster::new();
        let _idle = broadcaster.subscribe_with(Vec::new);
        let mut active = broadcaster.subscribe_with(Vec::new);

        // The idle subscriber never drains; the publisher and the active
        // subscriber must be unaffected.
        for i in 0..1_000 {
            broadcaster.publish(tick(i as f64));
        }
        let mut seen = 0;
        while active.try_recv().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 1_000);
    }

    #[tokio::test]
    async fn recv_waits_for_publish() {
        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe_with(Vec::new);

        let publisher = broadcaster.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            publisher.publish(tick(7.0));
        });

        assert_eq!(sub.recv().await, Some(tick(7.0)));
    }

    #[tokio::test]
    async fn next_yields_keepalive_when_idle() {
        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe_with(Vec::new);

        assert_eq!(sub.next(Duration::from_millis(10)).await, Delivery::KeepAlive);

        broadcaster.publish(tick(1.0));
        assert_eq!(
            sub.next(Duration::from_millis(10)).await,
            Delivery::Event(tick(1.0))
        );
    }

    #[test]
    fn concurrent_publishers_deliver_everything() {
        use std::thread;

        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe_with(Vec::new);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let publisher = broadcaster.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        publisher.publish(tick(i as f64));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = 0;
        while sub.try_recv().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 1_000);
    }
}
