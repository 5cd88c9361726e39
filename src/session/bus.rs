//! typed publish/subscribe for session events
use {
    crate::session::events::{EventKind, SessionEvent},
    hashbrown::HashMap,
    std::fmt,
};

/// a subscriber callback
pub type Callback = Box<dyn FnMut(&SessionEvent) + Send>;

/// a handle for removing a subscriber again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    /// what the subscriber listens for
    kind: EventKind,
    /// unique for the lifetime of the bus
    id: u64,
}

impl Subscription {
    /// what the subscriber listens for
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// subscribers keyed by event kind, called in registration order
#[derive(Default)]
pub struct EventBus {
    /// the next subscription id, never reused
    next_id: u64,
    /// the subscribers
    listeners: HashMap<EventKind, Vec<(u64, Callback)>>,
}

impl EventBus {
    /// make an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// add a subscriber for `kind`
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> Subscription
    where
        F: FnMut(&SessionEvent) + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;

        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));

        Subscription { kind, id }
    }

    /// remove a subscriber, returns whether it was still there
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let Some(list) = self.listeners.get_mut(&sub.kind) else {
            return false;
        };

        let before = list.len();
        list.retain(|(id, _)| *id != sub.id);
        before != list.len()
    }

    /// call every subscriber of the event's kind, returns how many ran
    pub fn publish(&mut self, event: &SessionEvent) -> usize {
        let Some(list) = self.listeners.get_mut(&event.kind()) else {
            return 0;
        };

        for (_, callback) in list.iter_mut() {
            callback(event);
        }

        list.len()
    }

    /// drop every subscriber
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// how many subscribers `kind` has
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// whether there are no subscribers at all
    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();

        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("listeners", &counts)
            .finish()
    }
}
