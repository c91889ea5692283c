//! Dotted-path addressing into a [`Record`].
//!
//! A path is one or more record keys joined by [`SEPARATOR`]. Reads are total:
//! a missing segment or a non-record intermediate simply yields `None`.

use crate::error::PathError;
use crate::value::{AttrValue, Record};

pub const SEPARATOR: char = '.';

/// Joins a prefix and a key; an empty prefix yields the key alone.
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        return key.to_string();
    }
    let mut out = String::with_capacity(prefix.len() + 1 + key.len());
    out.push_str(prefix);
    out.push(SEPARATOR);
    out.push_str(key);
    out
}

/// Splits a path into its parent path and terminal key.
pub fn split_parent(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once(SEPARATOR) {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    }
}

/// Strict ancestors of `path`, most specific first.
///
/// ```
/// use nested_attrs::ancestors;
///
/// let found: Vec<&str> = ancestors("x.y.z").collect();
/// assert_eq!(found, vec!["x.y", "x"]);
/// assert_eq!(ancestors("x").count(), 0);
/// ```
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut rest = path;
    std::iter::from_fn(move || {
        let (parent, _) = rest.rsplit_once(SEPARATOR)?;
        rest = parent;
        Some(parent)
    })
}

/// Resolves `path` through nested records.
pub fn get<'a>(tree: &'a Record, path: &str) -> Option<&'a AttrValue> {
    let mut segments = path.split(SEPARATOR);
    let first = segments.next()?;
    let mut current = tree.get(first)?;
    for segment in segments {
        current = match current {
            AttrValue::Record(record) => record.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable counterpart of [`get`] that stops at a record.
fn record_at_mut<'a>(tree: &'a mut Record, path: Option<&str>) -> Option<&'a mut Record> {
    let Some(path) = path else {
        return Some(tree);
    };
    let mut current = tree;
    for segment in path.split(SEPARATOR) {
        current = match current.get_mut(segment)? {
            AttrValue::Record(record) => record,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating missing intermediate records.
///
/// A `Null` intermediate counts as missing and is replaced by a record. Any
/// other non-record intermediate is never overwritten; the write is refused
/// with [`PathError::NotARecord`] instead. Returns the replaced value.
pub fn set_at_path(
    tree: &mut Record,
    path: &str,
    value: AttrValue,
) -> Result<Option<AttrValue>, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    let (parent, key) = split_parent(path);
    let mut current = tree;
    if let Some(parent) = parent {
        let mut end = 0;
        for (i, segment) in parent.split(SEPARATOR).enumerate() {
            end = if i == 0 { segment.len() } else { end + 1 + segment.len() };
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| AttrValue::Record(Record::new()));
            if slot.is_null() {
                *slot = AttrValue::Record(Record::new());
            }
            current = match slot {
                AttrValue::Record(record) => record,
                _ => {
                    return Err(PathError::NotARecord {
                        path: path[..end].to_string(),
                    })
                }
            };
        }
    }
    Ok(current.insert(key.to_string(), value))
}

/// Removes the terminal key of `path`. Ancestors are left in place even when
/// they become empty. Missing paths are a no-op.
pub fn unset_at_path(tree: &mut Record, path: &str) -> Option<AttrValue> {
    let (parent, key) = split_parent(path);
    record_at_mut(tree, parent)?.shift_remove(key)
}
