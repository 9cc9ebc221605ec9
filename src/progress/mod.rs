//! Progress reporting for crawls
//!
//! The crawler pushes [`ProgressEvent`]s into a [`ProgressSink`] in traversal
//! order and never waits on delivery. Transport concerns live behind the
//! sink: the bounded [`ChannelSink`] hands events to a separate worker, and
//! the [`ProgressRelay`] publishes them to observers held in an explicitly
//! owned [`ObserverRegistry`].

mod event;
mod relay;
mod sink;

pub use event::{EventKind, ProgressEvent, ERROR_CODE};
pub use relay::{ObserverRegistry, ProgressRelay};
pub use sink::{channel, ChannelSink, Delivery, NullSink, ProgressSink};
