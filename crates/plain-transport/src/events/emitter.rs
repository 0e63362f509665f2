//! Ordered listener set
//!
//! Listeners run synchronously in registration order. A panicking listener is
//! logged and skipped so it cannot break delivery to the others or the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;
use uuid::Uuid;

use super::{EventKind, TransportEvent};

/// Callback invoked for each delivered event
pub type EventListener = Arc<dyn Fn(&TransportEvent) + Send + Sync>;

/// Handle returned on registration, used to remove the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

#[derive(Clone)]
struct Registration {
    id: ListenerId,
    /// `None` receives every event
    kind: Option<EventKind>,
    listener: EventListener,
}

pub struct EventEmitter {
    name: &'static str,
    listeners: RwLock<Vec<Registration>>,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("name", &self.name)
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl EventEmitter {
    /// Create an emitter; `name` only shows up in logs
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Listen for one kind of event
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&TransportEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(listener))
    }

    /// Listen for every event
    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TransportEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    fn register(&self, kind: Option<EventKind>, listener: EventListener) -> ListenerId {
        let id = ListenerId(Uuid::new_v4());
        self.listeners.write().push(Registration { id, kind, listener });
        id
    }

    /// Remove a listener; false if it was not registered
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|r| r.id == id) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn remove_all_listeners(&self) {
        self.listeners.write().clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event` to matching listeners, returning how many ran to completion
    pub fn safe_emit(&self, event: &TransportEvent) -> usize {
        // Snapshot so listeners may register or unregister while being called.
        let snapshot: Vec<Registration> = self.listeners.read().clone();
        let kind = event.kind();

        let mut delivered = 0;
        for registration in snapshot
            .iter()
            .filter(|r| r.kind.map_or(true, |k| k == kind))
        {
            let listener = &registration.listener;
            match panic::catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => delivered += 1,
                Err(_) => error!(
                    "{} listener panicked while handling \"{}\" event",
                    self.name,
                    event.name()
                ),
            }
        }
        delivered
    }
}
