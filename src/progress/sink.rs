use super::ProgressEvent;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Outcome of a single emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Accepted,
    Dropped,
}

/// Capability to receive progress events from a crawl
///
/// Emission is best-effort and must not block: the crawler ignores the
/// returned [`Delivery`] apart from logging it.
///
/// Any `Fn(ProgressEvent)` closure is a sink:
///
/// ```
/// use link_atlas::progress::{ProgressEvent, ProgressSink};
/// use std::sync::Mutex;
///
/// let seen = Mutex::new(Vec::new());
/// let sink = |event: ProgressEvent| seen.lock().unwrap().push(event);
/// sink.emit(ProgressEvent::Completed { count: 0 });
/// assert_eq!(seen.lock().unwrap().len(), 1);
/// ```
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent) -> Delivery;
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent),
{
    fn emit(&self, event: ProgressEvent) -> Delivery {
        self(event);
        Delivery::Accepted
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) -> Delivery {
        Delivery::Dropped
    }
}

/// Bounded, non-blocking sink feeding a tokio channel
///
/// When the channel is full or its receiver is gone the event is dropped and
/// the crawl carries on.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<ProgressEvent>,
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) -> Delivery {
        match self.tx.try_send(event) {
            Ok(()) => Delivery::Accepted,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("Progress channel full, dropping {:?} event", event.kind());
                Delivery::Dropped
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!("Progress receiver gone, dropping {:?} event", event.kind());
                Delivery::Dropped
            }
        }
    }
}

/// Creates a bounded progress channel
///
/// The sink half goes to the crawler; the receiver half is drained by a
/// separate worker such as [`ProgressRelay`](super::ProgressRelay).
pub fn channel(capacity: usize) -> (ChannelSink, mpsc::Receiver<ProgressEvent>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelSink { tx }, rx)
}
