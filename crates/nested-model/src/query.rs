//! Read-side queries: live lookups, snapshots and diffs.

use nested_attrs::{deep_clone_record, flatten, flatten_into, get, AttrValue, Attrs, PathMap, Record};
use serde_json::Value;

use crate::error::ApplyError;
use crate::model::{ChangeSet, Model};
use crate::options::SetOptions;

impl Model {
    pub fn read(&self, path: &str) -> Option<&AttrValue> {
        get(&self.attributes, path)
    }

    /// `true` when `path` holds a non-null value.
    pub fn has(&self, path: &str) -> bool {
        self.read(path).is_some_and(|value| !value.is_null())
    }

    /// Deep copy of the attribute tree; entity references are kept by handle.
    pub fn serialize(&self) -> Record {
        deep_clone_record(&self.attributes)
    }

    pub fn to_json(&self) -> Value {
        AttrValue::Record(self.serialize()).to_json()
    }

    /// Without a path: whether anything differs from the previous snapshot.
    /// With a path: whether that exact leaf path does.
    pub fn changed_since(&self, path: Option<&str>) -> bool {
        match path {
            None => !self.changed.is_empty(),
            Some(path) => self.changed.contains_key(path),
        }
    }

    pub fn changed(&self) -> &ChangeSet {
        &self.changed
    }

    /// Without a candidate: the net changes of the last burst, with record
    /// values expanded to leaf paths. With a candidate: the candidate leaves
    /// that differ from the reference state, which is the previous snapshot
    /// while a burst is in progress and the live tree otherwise.
    ///
    /// Returns `None` when nothing differs.
    pub fn diff_against(&self, candidate: Option<&Record>) -> Option<ChangeSet> {
        let diff = match candidate {
            None => self.flattened_changes(),
            Some(candidate) => {
                let reference = match (&self.previous, self.dispatcher.is_active()) {
                    (Some(previous), true) => previous,
                    _ => &self.attributes,
                };
                let old = flatten(reference);
                flatten(candidate)
                    .into_iter()
                    .filter(|(path, value)| old.get(path) != Some(value))
                    .map(|(path, value)| (path, Some(value)))
                    .collect()
            }
        };
        if diff.is_empty() {
            None
        } else {
            Some(diff)
        }
    }

    /// Value of `path` in the previous snapshot.
    pub fn previous_value(&self, path: &str) -> Option<&AttrValue> {
        get(self.previous.as_ref()?, path)
    }

    pub fn previous_attributes(&self) -> Option<Record> {
        self.previous.as_ref().map(deep_clone_record)
    }

    /// Removes every leaf in one burst. Records emptied along the way stay in
    /// place.
    pub fn clear(&mut self, options: SetOptions) -> Result<(), ApplyError> {
        let leaves: PathMap = flatten(&self.attributes)
            .into_keys()
            .map(|path| (path, AttrValue::Null))
            .collect();
        self.apply(Attrs::Flat(leaves), options.with_unset())
    }

    fn flattened_changes(&self) -> ChangeSet {
        let mut out = ChangeSet::with_capacity(self.changed.len());
        for (path, value) in &self.changed {
            match value {
                Some(AttrValue::Record(record)) if !record.is_empty() => {
                    let mut leaves = PathMap::new();
                    flatten_into(record, path, &mut leaves);
                    out.extend(leaves.into_iter().map(|(leaf, value)| (leaf, Some(value))));
                }
                _ => {
                    out.insert(path.clone(), value.clone());
                }
            }
        }
        out
    }
}
