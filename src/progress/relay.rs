//! Fan-out of progress events to registered observers
//!
//! The [`ObserverRegistry`] is created by the orchestrator at startup and
//! passed by reference to whatever needs to publish. A [`ProgressRelay`]
//! drains one crawl's progress channel and publishes each event as a JSON
//! envelope to that crawl's observer.

use super::{EventKind, ProgressEvent};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Registry of observers keyed by client id
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct ObserverRegistry {
    observers: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer, replacing any previous one with the same id
    ///
    /// Returns the receiving end of the observer's message queue.
    pub fn register(&self, client_id: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        if observers.insert(client_id.to_string(), tx).is_some() {
            tracing::debug!("Replaced existing observer {}", client_id);
        }
        rx
    }

    pub fn unregister(&self, client_id: &str) {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        observers.remove(client_id);
    }

    /// Delivers a message to one observer
    ///
    /// Returns false if no such observer exists. An observer whose queue has
    /// been closed is unregistered.
    pub fn publish(&self, client_id: &str, message: String) -> bool {
        let sent = {
            let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
            match observers.get(client_id) {
                Some(tx) => tx.send(message).is_ok(),
                None => return false,
            }
        };

        if !sent {
            tracing::debug!("Observer {} disconnected", client_id);
            self.unregister(client_id);
        }
        sent
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Envelope<'a, T: Serialize> {
    Progress {
        task_id: u64,
        kind: EventKind,
        message: String,
        count: u64,
    },
    Result {
        task_id: u64,
        data: &'a T,
    },
}

/// Publishes one crawl's progress to its observer
#[derive(Debug, Clone)]
pub struct ProgressRelay {
    registry: ObserverRegistry,
    client_id: String,
    task_id: u64,
}

impl ProgressRelay {
    pub fn new(registry: ObserverRegistry, client_id: impl Into<String>, task_id: u64) -> Self {
        Self {
            registry,
            client_id: client_id.into(),
            task_id,
        }
    }

    /// Spawns a worker draining `events` until every sender is dropped
    ///
    /// The handle resolves to the number of events delivered. Delivery
    /// failures are logged and skipped.
    pub fn spawn(self, mut events: mpsc::Receiver<ProgressEvent>) -> JoinHandle<usize> {
        tokio::spawn(async move {
            let mut delivered = 0;
            while let Some(event) = events.recv().await {
                if self.publish_event(&event) {
                    delivered += 1;
                }
            }
            tracing::debug!(
                "Relay for task {} finished after {} events",
                self.task_id,
                delivered
            );
            delivered
        })
    }

    /// Publishes a single progress event
    pub fn publish_event(&self, event: &ProgressEvent) -> bool {
        let envelope: Envelope<'_, ()> = Envelope::Progress {
            task_id: self.task_id,
            kind: event.kind(),
            message: event.message(),
            count: event.count(),
        };
        self.send(&envelope)
    }

    /// Publishes the final result of the task
    pub fn publish_result<T: Serialize>(&self, data: &T) -> bool {
        let envelope = Envelope::Result {
            task_id: self.task_id,
            data,
        };
        self.send(&envelope)
    }

    fn send<T: Serialize>(&self, envelope: &Envelope<'_, T>) -> bool {
        let message = match serde_json::to_string(envelope) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to encode progress envelope: {}", e);
                return false;
            }
        };

        let delivered = self.registry.publish(&self.client_id, message);
        if !delivered {
            tracing::warn!(
                "Progress for task {} not delivered: no observer {}",
                self.task_id,
                self.client_id
            );
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{channel, ProgressSink};

    #[test]
    fn test_publish_to_registered_observer() {
        let registry = ObserverRegistry::new();
        let mut rx = registry.register("client-1");

        assert!(registry.publish("client-1", "hello".to_string()));
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_publish_to_unknown_observer() {
        let registry = ObserverRegistry::new();
        assert!(!registry.publish("nobody", "hello".to_string()));
    }

    #[test]
    fn test_closed_observer_is_unregistered() {
        let registry = ObserverRegistry::new();
        let rx = registry.register("client-1");
        drop(rx);

        assert!(!registry.publish("client-1", "hello".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_replaces_previous() {
        let registry = ObserverRegistry::new();
        let _old = registry.register("client-1");
        let mut new = registry.register("client-1");

        assert_eq!(registry.len(), 1);
        assert!(registry.publish("client-1", "hi".to_string()));
        assert_eq!(new.try_recv().unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_relay_forwards_events_in_order() {
        let registry = ObserverRegistry::new();
        let mut observer = registry.register("client-1");
        let (sink, events) = channel(16);

        let relay = ProgressRelay::new(registry.clone(), "client-1", 42);
        let handle = relay.spawn(events);

        sink.emit(ProgressEvent::PageStarted {
            url: "http://a.test".into(),
            depth: 0,
        });
        sink.emit(ProgressEvent::Completed { count: 1 });
        drop(sink);

        assert_eq!(handle.await.unwrap(), 2);

        let first: serde_json::Value =
            serde_json::from_str(&observer.recv().await.unwrap()).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(&observer.recv().await.unwrap()).unwrap();

        assert_eq!(first["type"], "progress");
        assert_eq!(first["task_id"], 42);
        assert_eq!(first["kind"], "page_started");
        assert_eq!(first["count"], 0);
        assert_eq!(second["kind"], "completed");
        assert_eq!(second["count"], 1);
    }

    #[test]
    fn test_publish_result_envelope() {
        let registry = ObserverRegistry::new();
        let mut observer = registry.register("client-1");
        let relay = ProgressRelay::new(registry, "client-1", 7);

        assert!(relay.publish_result(&serde_json::json!({ "links": ["/a"] })));

        let value: serde_json::Value = serde_json::from_str(&observer.try_recv().unwrap()).unwrap();
        assert_eq!(value["type"], "result");
        assert_eq!(value["task_id"], 7);
        assert_eq!(value["data"]["links"][0], "/a");
    }
}
