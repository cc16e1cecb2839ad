use std::sync::{Arc, Mutex};

use tokio::time::Instant;

/// Something a test double observed, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Direction(bool),
    Enable(bool),
    Wrote(Vec<u8>),
    Flushed,
}

/// Event log shared between the line and stream doubles of one test.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<(Instant, Event)>>>);

impl Journal {
    pub fn record(&self, event: Event) {
        self.0
            .lock()
            .expect("Journal mutex was poisoned")
            .push((Instant::now(), event));
    }

    pub fn entries(&self) -> Vec<(Instant, Event)> {
        self.0.lock().expect("Journal mutex was poisoned").clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.entries().into_iter().map(|(_, event)| event).collect()
    }
}
