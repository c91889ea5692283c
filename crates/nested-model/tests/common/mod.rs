#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use nested_model::{AttrValue, ChangeEvent, EventBus, Model, ModelBuilder, Record};

/// Event names (and values) seen by a catch-all listener.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<ChangeEvent>>>,
}

impl Recorder {
    pub fn attach(bus: &EventBus) -> Self {
        let recorder = Recorder::default();
        let events = Rc::clone(&recorder.events);
        bus.on_all(move |_, event| events.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn names(&self) -> Vec<String> {
        self.events.borrow().iter().map(ChangeEvent::name).collect()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.names().iter().filter(|n| *n == name).count()
    }

    pub fn value_of(&self, name: &str) -> Option<Option<AttrValue>> {
        self.events
            .borrow()
            .iter()
            .find(|event| event.name() == name)
            .map(|event| event.value().cloned())
    }

    pub fn reset(&self) {
        self.events.borrow_mut().clear();
    }
}

pub fn record(value: serde_json::Value) -> Record {
    nested_model::AttrValue::from(value).into_record().unwrap()
}

/// A model wired to a fresh bus that records every event.
pub fn observed(builder: ModelBuilder) -> (Model, Rc<EventBus>, Recorder) {
    let bus = Rc::new(EventBus::new());
    let recorder = Recorder::attach(&bus);
    let model = builder.emitter(Rc::clone(&bus)).build();
    (model, bus, recorder)
}

pub fn int(n: i64) -> AttrValue {
    AttrValue::from(n)
}
