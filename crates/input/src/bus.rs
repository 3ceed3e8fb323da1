use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::event::{Event, EventKind};

pub type Handler = Box<dyn FnMut(&Event)>;

/// Dispatches events to the handlers registered for their [`EventKind`].
///
/// Handlers of one kind run in registration order.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.handlers
            .entry(kind)
            .or_default()
            .push(Box::new(handler));
    }

    /// Invokes the handlers registered for the event kind and returns how many
    /// ran.
    pub fn dispatch(&mut self, event: &Event) -> usize {
        let Some(handlers) = self.handlers.get_mut(&event.kind()) else {
            return 0;
        };
        for handler in handlers.iter_mut() {
            handler(event);
        }
        trace!("dispatched {:?} to {} handler(s)", event.kind(), handlers.len());
        handlers.len()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (*kind, handlers.len()))
            .collect();
        kinds.sort();
        f.debug_struct("EventBus").field("handlers", &kinds).finish()
    }
}
