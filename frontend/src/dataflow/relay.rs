//! Event streaming from UI handlers into actors.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sending half of an unbounded event channel.
///
/// Any number of UI handlers may hold a clone; the receiving actor sees the
/// events in the order they were sent.
///
/// Relays are named after the event source: `command_relay`,
/// `resize_started_relay`, `copy_requested_relay`.
#[derive(Clone, Debug)]
pub struct Relay<T = ()>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Relay { sender }, receiver)
    }

    /// Sends an event. Events sent after the receiver is dropped are discarded.
    pub fn send(&self, value: T) {
        let _ = self.sender.unbounded_send(value);
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
