use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use serde::Serialize;

use crate::signal::FanoutSink;

/// How many undelivered events a single client may accumulate before it
/// starts missing them.
const CLIENT_BUFFER: usize = 64;

/// One delivered reading, shaped like the wire payload the display clients
/// expect: a named event carrying the scaled value and a millisecond id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorEvent {
    pub event: &'static str,
    pub val: f32,
    pub id: u64,
}

impl MonitorEvent {
    pub fn value(val: f32, id: u64) -> Self {
        Self {
            event: "value",
            val,
            id,
        }
    }
}

/// Best-effort fan-out to any number of subscribed display clients.
///
/// Each subscriber gets its own bounded buffer; a slow client misses events
/// rather than holding up delivery to the others, and a disconnected client
/// is dropped from the list on the next publish.
#[derive(Default)]
pub struct EventFeed {
    subscribers: Mutex<Vec<Sender<MonitorEvent>>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<MonitorEvent> {
        let (sender, receiver) = bounded(CLIENT_BUFFER);
        self.subscribers.lock().push(sender);

        receiver
    }

    pub fn client_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn publish(&self, event: MonitorEvent) {
        self.subscribers.lock().retain(|client| {
            match client.try_send(event) {
                Ok(()) => true,
                // Full buffer: this client misses the event, others don't.
                Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            }
        });
    }
}

impl FanoutSink for EventFeed {
    fn deliver(&self, value: f32, timestamp_ms: u64) {
        self.publish(MonitorEvent::value(value, timestamp_ms));
    }
}
