//! Nullable event sink — records everything a listener receives.

use std::sync::{Arc, Mutex, PoisonError};

/// Shared recording of emitted events. Clone it, hand [`listener`] to the
/// component under test, then inspect [`recorded`].
///
/// [`listener`]: NullEventLog::listener
/// [`recorded`]: NullEventLog::recorded
#[derive(Debug)]
pub struct NullEventLog<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> NullEventLog<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A listener closure that appends every event it sees to this log.
    pub fn listener(&self) -> impl Fn(&T) + Send + Sync + 'static {
        let events = Arc::clone(&self.events);
        move |event: &T| {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone())
        }
    }

    /// Snapshot of recorded events, in arrival order.
    pub fn recorded(&self) -> Vec<T> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + 'static> Default for NullEventLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NullEventLog<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}
