use crate::value::{AttrValue, Record};

/// Creates a deep clone of an attribute value.
///
/// Records and arrays are rebuilt recursively. Entity references are copied
/// by handle, so the clone still points at the same live entity.
///
/// # Examples
///
/// ```
/// use nested_attrs::{deep_clone, AttrValue, EntityRef};
///
/// let owner = EntityRef::new("c12");
/// let original = AttrValue::Array(vec![AttrValue::from(1), AttrValue::from(owner.clone())]);
/// let cloned = deep_clone(&original);
///
/// assert_eq!(original, cloned);
/// assert!(cloned.as_array().unwrap()[1].as_entity().unwrap().same_handle(&owner));
/// ```
pub fn deep_clone(value: &AttrValue) -> AttrValue {
    match value {
        AttrValue::Null => AttrValue::Null,
        AttrValue::Bool(b) => AttrValue::Bool(*b),
        AttrValue::Number(n) => AttrValue::Number(n.clone()),
        AttrValue::String(s) => AttrValue::String(s.clone()),
        AttrValue::Array(items) => AttrValue::Array(items.iter().map(deep_clone).collect()),
        AttrValue::Record(record) => AttrValue::Record(deep_clone_record(record)),
        AttrValue::Entity(entity) => AttrValue::Entity(entity.clone()),
    }
}

/// Deep clone of a whole record, see [`deep_clone`].
pub fn deep_clone_record(record: &Record) -> Record {
    let mut out = Record::with_capacity(record.len());
    for (key, val) in record {
        out.insert(key.clone(), deep_clone(val));
    }
    out
}
