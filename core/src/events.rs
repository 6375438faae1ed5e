/*!
# Events Module

This module defines the notifications a poller emits besides handler side
effects and delete calls:
- `EmptyQueue` when a receive call returned no messages
- `FetchError` when a receive call failed and the poller is backing off
- `MessageError` when a handler failed, panicked, or the delete call failed

Observers implement `PollerObserver`. `ChannelObserver` forwards every event
to an unbounded channel, and plain closures can observe as well.
*/

use crate::error::SluiceError;
use tokio::sync::mpsc;

/// A notification emitted by the poller
#[derive(Debug)]
pub enum PollerEvent {
    /// A receive call returned no messages
    EmptyQueue,

    /// A receive call failed
    FetchError(SluiceError),

    /// Processing a message failed; the message is left for redelivery
    MessageError {
        message_id: String,
        error: SluiceError,
    },
}

/// Receives notifications from a poller.
///
/// Called from worker loops and handler tasks, so implementations must not
/// block.
pub trait PollerObserver: Send + Sync + 'static {
    fn notify(&self, event: PollerEvent);
}

impl<F> PollerObserver for F
where
    F: Fn(PollerEvent) + Send + Sync + 'static,
{
    fn notify(&self, event: PollerEvent) {
        (self)(event)
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PollerObserver for NoopObserver {
    fn notify(&self, _event: PollerEvent) {}
}

/// Observer forwarding events to an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<PollerEvent>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PollerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl PollerObserver for ChannelObserver {
    fn notify(&self, event: PollerEvent) {
        // Receiver gone means nobody is listening anymore
        let _ = self.sender.send(event);
    }
}
