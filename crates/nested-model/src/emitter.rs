//! Event emission capability.
//!
//! The model does not own subscriptions. It is handed an [`Emitter`] at
//! construction and forwards every event to it together with `&mut Model`,
//! so listeners may mutate the model re-entrantly. [`EventBus`] is a small
//! in-process emitter with `on`/`off` registration.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::event::ChangeEvent;
use crate::model::Model;

pub trait Emitter {
    fn emit(&self, model: &mut Model, event: &ChangeEvent);
}

/// Emitter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Emitter for Silent {
    fn emit(&self, _model: &mut Model, _event: &ChangeEvent) {}
}

pub type Listener = Rc<dyn Fn(&mut Model, &ChangeEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Topic {
    All,
    Named(String),
}

impl Topic {
    fn matches(&self, name: &str) -> bool {
        match self {
            Topic::All => true,
            Topic::Named(topic) => topic == name,
        }
    }
}

/// Listeners keyed by event name, invoked in registration order.
pub struct EventBus {
    next_listener_id: Cell<u64>,
    listeners: RefCell<BTreeMap<ListenerId, (Topic, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            next_listener_id: Cell::new(1),
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Subscribes to one event name, e.g. `change:net.vlan` or `change:net.*`.
    pub fn on<F>(&self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&mut Model, &ChangeEvent) + 'static,
    {
        self.register(Topic::Named(name.into()), Rc::new(listener))
    }

    /// Subscribes to every event.
    pub fn on_all<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&mut Model, &ChangeEvent) + 'static,
    {
        self.register(Topic::All, Rc::new(listener))
    }

    pub fn off(&self, listener_id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(&listener_id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn register(&self, topic: Topic, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0.saturating_add(1));
        self.listeners.borrow_mut().insert(id, (topic, listener));
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Emitter for EventBus {
    fn emit(&self, model: &mut Model, event: &ChangeEvent) {
        let name = event.name();
        // Snapshot first: listeners may register or remove listeners.
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .values()
            .filter(|(topic, _)| topic.matches(&name))
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in matching {
            (*listener)(model, event);
        }
    }
}
