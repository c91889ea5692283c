//! The observable model and its mutation engine.

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use nested_attrs::{
    ancestors, deep_clone_record, get, merge, overlay, AttrValue, Attrs, Record, Update,
};

use crate::config::ModelConfig;
use crate::dispatch::Dispatcher;
use crate::emitter::{Emitter, Silent};
use crate::error::ApplyError;
use crate::event::ChangeEvent;
use crate::options::SetOptions;
use crate::validate::{ValidationError, Validator};

/// Path-keyed net changes since the previous snapshot; `None` marks a
/// removed path.
pub type ChangeSet = IndexMap<String, Option<AttrValue>>;

static NEXT_CID: AtomicU64 = AtomicU64::new(1);

fn next_cid() -> String {
    format!("c{}", NEXT_CID.fetch_add(1, Ordering::Relaxed))
}

pub struct Model {
    cid: String,
    id: Option<AttrValue>,
    id_attribute: String,
    pub(crate) attributes: Record,
    pub(crate) previous: Option<Record>,
    pub(crate) changed: ChangeSet,
    validation_error: Option<ValidationError>,
    pub(crate) dispatcher: Dispatcher,
    emitter: Rc<dyn Emitter>,
    validator: Option<Rc<dyn Validator>>,
}

pub struct ModelBuilder {
    config: ModelConfig,
    attributes: Record,
    emitter: Rc<dyn Emitter>,
    validator: Option<Rc<dyn Validator>>,
    initialize: Option<Box<dyn FnOnce(&mut Model)>>,
}

impl ModelBuilder {
    fn new() -> Self {
        Self {
            config: ModelConfig::default(),
            attributes: Record::new(),
            emitter: Rc::new(Silent),
            validator: None,
            initialize: None,
        }
    }

    pub fn config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id_attribute(mut self, id_attribute: impl Into<String>) -> Self {
        self.config.id_attribute = id_attribute.into();
        self
    }

    pub fn defaults(mut self, defaults: Record) -> Self {
        self.config.defaults = defaults;
        self
    }

    /// Initial attributes, deep merged over the defaults.
    pub fn attributes(mut self, attributes: Record) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn emitter<E: Emitter + 'static>(mut self, emitter: Rc<E>) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Record, &SetOptions) -> Result<(), ValidationError> + 'static,
    {
        self.validator = Some(Rc::new(validator));
        self
    }

    pub fn validator_object(mut self, validator: Rc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Hook run once with the fully constructed model.
    pub fn initialize<F>(mut self, initialize: F) -> Self
    where
        F: FnOnce(&mut Model) + 'static,
    {
        self.initialize = Some(Box::new(initialize));
        self
    }

    pub fn build(self) -> Model {
        let ModelBuilder {
            config,
            attributes,
            emitter,
            validator,
            initialize,
        } = self;
        let mut seed = config.defaults;
        merge(&mut seed, attributes);

        let mut model = Model {
            cid: next_cid(),
            id: None,
            id_attribute: config.id_attribute,
            attributes: seed,
            previous: None,
            changed: ChangeSet::new(),
            validation_error: None,
            dispatcher: Dispatcher::new(),
            emitter,
            validator,
        };
        model.refresh_id();
        if let Some(initialize) = initialize {
            initialize(&mut model);
        }
        model
    }
}

impl Model {
    /// An empty model with default configuration and no emitter.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Client id, unique within the process.
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Cached value of the id attribute.
    pub fn id(&self) -> Option<&AttrValue> {
        self.id.as_ref()
    }

    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    /// Error from the most recent failed validation, cleared by the next
    /// successful one.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    /// Merges `input` into the attribute tree and announces what changed.
    ///
    /// Returns `Err(ApplyError::Invalid)` when the validator rejects the
    /// update and `Err(ApplyError::Path)` when a path would have to pass
    /// through a non-record value. In both cases nothing is mutated.
    ///
    /// Listeners may call `apply` again while events are being emitted. Such
    /// nested calls emit their own attribute events immediately and leave the
    /// generic `change` events to the outermost call.
    pub fn apply(&mut self, input: impl Into<Attrs>, options: SetOptions) -> Result<(), ApplyError> {
        let input = input.into();
        if input.is_empty() {
            return Ok(());
        }
        let updates = input.into_updates(options.unset);
        let next = overlay(&self.attributes, &updates)?;
        if options.validate {
            self.run_validator(&next, options)?;
        }

        let outermost = self.dispatcher.begin();
        if outermost {
            self.previous = Some(deep_clone_record(&self.attributes));
            self.changed.clear();
        }

        let changes = self.record_changes(&updates, &next);
        self.attributes = next;
        if updates.iter().any(|update| update.path() == self.id_attribute) {
            self.refresh_id();
        }
        tracing::debug!(
            cid = %self.cid,
            updates = updates.len(),
            changes = changes.len(),
            outermost,
            "applied attribute update"
        );

        if !options.silent && !changes.is_empty() {
            self.dispatcher.announce(options);
            self.emit_attribute_changes(&changes, options);
        }
        if !outermost {
            return Ok(());
        }
        self.drain();
        Ok(())
    }

    /// Writes one path.
    ///
    /// Plain `f64` values go through `From<f64>`, which stores NaN and
    /// infinities as `Null`. Use [`AttrValue::from_finite`] to catch them
    /// first.
    pub fn set(
        &mut self,
        path: &str,
        value: impl Into<AttrValue>,
        options: SetOptions,
    ) -> Result<(), ApplyError> {
        self.apply(Attrs::single(path, value), options)
    }

    /// Removes one path.
    pub fn unset(&mut self, path: &str, options: SetOptions) -> Result<(), ApplyError> {
        self.apply(Attrs::single(path, AttrValue::Null), options.with_unset())
    }

    /// Runs the validator against the current attributes. A failure is
    /// cached and announced exactly like a rejected update.
    pub fn is_valid(&mut self) -> bool {
        let attrs = deep_clone_record(&self.attributes);
        self.run_validator(&attrs, SetOptions::new().with_validate())
            .is_ok()
    }

    /// Per-call change list against the live tree, and Changed Map upkeep
    /// against the snapshot. Each touched path is judged by the value it
    /// holds in `next`, so overlapping paths in one input agree with the
    /// resulting tree. Must run before `next` is swapped in.
    fn record_changes(&mut self, updates: &[Update], next: &Record) -> Vec<String> {
        let mut changes = Vec::new();
        for update in updates {
            let path = update.path();
            let after = get(next, path);
            if get(&self.attributes, path) != after {
                changes.push(path.to_string());
            }
            let before = self.previous.as_ref().and_then(|prev| get(prev, path));
            if before != after {
                self.changed.insert(path.to_string(), after.cloned());
            } else {
                self.changed.shift_remove(path);
            }
        }
        changes
    }

    fn refresh_id(&mut self) {
        self.id = get(&self.attributes, &self.id_attribute).cloned();
    }

    fn run_validator(&mut self, attrs: &Record, options: SetOptions) -> Result<(), ValidationError> {
        let Some(validator) = self.validator.clone() else {
            return Ok(());
        };
        match validator.validate(attrs, &options) {
            Ok(()) => {
                self.validation_error = None;
                Ok(())
            }
            Err(error) => {
                tracing::debug!(cid = %self.cid, %error, "validation rejected update");
                self.validation_error = Some(error.clone());
                self.emit(ChangeEvent::Invalid {
                    error: error.clone(),
                    options,
                });
                Err(error)
            }
        }
    }

    fn emit_attribute_changes(&mut self, changes: &[String], options: SetOptions) {
        let mut wildcards = HashSet::new();
        for path in changes {
            let value = get(&self.attributes, path).cloned();
            self.emit(ChangeEvent::Attribute {
                path: path.clone(),
                value,
                options,
            });
            for parent in ancestors(path) {
                if !wildcards.insert(parent.to_string()) {
                    continue;
                }
                let value = get(&self.attributes, parent).cloned();
                self.emit(ChangeEvent::Wildcard {
                    parent: parent.to_string(),
                    value,
                    options,
                });
            }
        }
    }

    fn drain(&mut self) {
        while let Some(options) = self.dispatcher.next_announcement() {
            self.emit(ChangeEvent::Change { options });
        }
        self.dispatcher.finish();
        tracing::debug!(cid = %self.cid, changed = self.changed.len(), "burst settled");
    }

    fn emit(&mut self, event: ChangeEvent) {
        tracing::trace!(cid = %self.cid, event = %event.name(), "emit");
        let emitter = Rc::clone(&self.emitter);
        emitter.emit(self, &event);
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("cid", &self.cid)
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("changed", &self.changed)
            .field("phase", &self.dispatcher.phase())
            .finish_non_exhaustive()
    }
}
