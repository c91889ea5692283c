//! Observable nested attribute model.
//!
//! A [`Model`] holds a nested attribute tree, addresses it with dotted paths
//! and reports changes through an injected [`Emitter`]:
//!
//! - `change:<path>` for every leaf whose value changed in an `apply` call,
//! - `change:<parent>.*` once per ancestor of the changed leaves,
//! - `change` once per announcing call, after the whole burst has settled,
//! - `invalid` when the validator rejects an update.
//!
//! Listeners receive `&mut Model` and may apply further updates; those are
//! folded into the running burst instead of starting a new one.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use nested_model::{EventBus, Model, SetOptions};
//! use serde_json::json;
//!
//! let bus = Rc::new(EventBus::new());
//! let fired = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&fired);
//! bus.on_all(move |_, event| log.borrow_mut().push(event.name()));
//!
//! let mut model = Model::builder().emitter(Rc::clone(&bus)).build();
//! model.apply(json!({"net": {"vlan": 10, "tag": "x"}}), SetOptions::new()).unwrap();
//!
//! assert_eq!(model.read("net.vlan").and_then(|v| v.as_i64()), Some(10));
//! assert!(model.changed_since(Some("net.vlan")));
//! assert_eq!(
//!     *fired.borrow(),
//!     vec!["change:net.vlan", "change:net.*", "change:net.tag", "change"]
//! );
//! ```

pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod event;
pub mod model;
pub mod options;
mod query;
pub mod validate;

pub use config::{ModelConfig, DEFAULT_ID_ATTRIBUTE};
pub use dispatch::{Dispatcher, Phase};
pub use emitter::{Emitter, EventBus, Listener, ListenerId, Silent};
pub use error::ApplyError;
pub use event::{attribute_event_name, wildcard_event_name, ChangeEvent, CHANGE, INVALID};
pub use model::{ChangeSet, Model, ModelBuilder};
pub use options::SetOptions;
pub use validate::{ValidationError, Validator};

pub use nested_attrs::{AttrValue, Attrs, EntityRef, Record};
