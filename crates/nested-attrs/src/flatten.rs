use indexmap::IndexMap;

use crate::clone::deep_clone;
use crate::error::PathError;
use crate::path::{join, set_at_path};
use crate::value::{AttrValue, Record};

/// Flat `path -> value` view of a tree.
pub type PathMap = IndexMap<String, AttrValue>;

/// Flattens a tree into leaf paths.
///
/// Only non-empty records are descended into. Arrays, scalars, entity
/// references and empty records become leaves, so an empty record survives
/// the round trip through [`unflatten`].
///
/// ```
/// use nested_attrs::{flatten, AttrValue};
/// use serde_json::json;
///
/// let tree = AttrValue::from(json!({"a": {"b": 1, "c": {}}, "d": [1, 2]}))
///     .into_record()
///     .unwrap();
/// let flat = flatten(&tree);
///
/// let paths: Vec<&str> = flat.keys().map(String::as_str).collect();
/// assert_eq!(paths, vec!["a.b", "a.c", "d"]);
/// ```
pub fn flatten(tree: &Record) -> PathMap {
    let mut out = PathMap::new();
    flatten_into(tree, "", &mut out);
    out
}

/// Flattens `tree` below `prefix`, appending leaves to `out`.
pub fn flatten_into(tree: &Record, prefix: &str, out: &mut PathMap) {
    for (key, value) in tree {
        let path = join(prefix, key);
        match value {
            AttrValue::Record(inner) if !inner.is_empty() => flatten_into(inner, &path, out),
            _ => {
                out.insert(path, deep_clone(value));
            }
        }
    }
}

/// Rebuilds a tree from leaf paths.
pub fn unflatten(paths: &PathMap) -> Result<Record, PathError> {
    let mut tree = Record::new();
    for (path, value) in paths {
        set_at_path(&mut tree, path, deep_clone(value))?;
    }
    Ok(tree)
}
