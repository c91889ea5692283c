//! Partial updates.
//!
//! Inputs arrive either nested ([`Attrs::Tree`]) or already flat
//! ([`Attrs::Flat`]). Both are lowered to a list of [`Update`] steps so the
//! consumer never has to probe values to tell records from leaves.

use serde_json::Value;

use crate::clone::deep_clone_record;
use crate::error::PathError;
use crate::flatten::{flatten, PathMap};
use crate::path::{set_at_path, unset_at_path};
use crate::value::{AttrValue, Record};

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Set { path: String, value: AttrValue },
    Unset { path: String },
}

impl Update {
    pub fn path(&self) -> &str {
        match self {
            Update::Set { path, .. } | Update::Unset { path } => path,
        }
    }

    /// The value the path holds after this step; `None` for removals.
    pub fn value(&self) -> Option<&AttrValue> {
        match self {
            Update::Set { value, .. } => Some(value),
            Update::Unset { .. } => None,
        }
    }

    /// Applies this step to `tree`.
    pub fn apply_to(&self, tree: &mut Record) -> Result<(), PathError> {
        match self {
            Update::Set { path, value } => {
                set_at_path(tree, path, value.clone())?;
            }
            Update::Unset { path } => {
                unset_at_path(tree, path);
            }
        }
        Ok(())
    }
}

/// Input to a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Attrs {
    /// Nested partial update, flattened before use.
    Tree(Record),
    /// Pre-flattened `path -> value` pairs, used as-is.
    Flat(PathMap),
}

impl Attrs {
    /// A one-entry flat input.
    pub fn single(path: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let mut paths = PathMap::with_capacity(1);
        paths.insert(path.into(), value.into());
        Attrs::Flat(paths)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Attrs::Tree(record) => record.is_empty(),
            Attrs::Flat(paths) => paths.is_empty(),
        }
    }

    /// Lowers the input to update steps in flattening order. With `unset`,
    /// every entry becomes a removal regardless of its value.
    pub fn into_updates(self, unset: bool) -> Vec<Update> {
        let paths = match self {
            Attrs::Tree(record) => flatten(&record),
            Attrs::Flat(paths) => paths,
        };
        paths
            .into_iter()
            .map(|(path, value)| {
                if unset {
                    Update::Unset { path }
                } else {
                    Update::Set { path, value }
                }
            })
            .collect()
    }
}

impl Default for Attrs {
    fn default() -> Self {
        Attrs::Tree(Record::new())
    }
}

impl From<Record> for Attrs {
    fn from(record: Record) -> Self {
        Attrs::Tree(record)
    }
}

impl From<Value> for Attrs {
    /// Objects become a nested update; any other JSON value is an empty input.
    fn from(value: Value) -> Self {
        match AttrValue::from(value) {
            AttrValue::Record(record) => Attrs::Tree(record),
            _ => Attrs::default(),
        }
    }
}

/// Returns a copy of `tree` with `updates` applied, leaving `tree` untouched.
pub fn overlay(tree: &Record, updates: &[Update]) -> Result<Record, PathError> {
    let mut next = deep_clone_record(tree);
    for update in updates {
        update.apply_to(&mut next)?;
    }
    Ok(next)
}

/// Deep-merges `incoming` into `base`: records present on both sides are
/// merged key by key, anything else in `incoming` replaces the base value.
pub fn merge(base: &mut Record, incoming: Record) {
    for (key, value) in incoming {
        match (base.get_mut(&key), value) {
            (Some(AttrValue::Record(existing)), AttrValue::Record(inner)) => merge(existing, inner),
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}
