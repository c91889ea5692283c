//! Attribute values.
//!
//! [`AttrValue`] mirrors `serde_json::Value` with one extra variant,
//! [`AttrValue::Entity`], for references to live entities owned by the host
//! framework. Entity references are atomic: they are never recursed into,
//! flattened or structurally cloned.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::rc::Rc;

/// A nested record: insertion ordered, compared without regard to order.
pub type Record = IndexMap<String, AttrValue>;

/// Equality is structural for arrays and records (key order ignored), by id
/// for entity references and by numeric value for numbers, so `1500` and
/// `1500.0` are equal.
#[derive(Debug, Clone, Default)]
pub enum AttrValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<AttrValue>),
    Record(Record),
    Entity(EntityRef),
}

/// Handle to a live entity (another model or collection) held by reference.
///
/// Cloning copies the handle; both copies point at the same id allocation.
/// Two handles are equal when their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef(Rc<str>);

impl EntityRef {
    pub fn new(id: impl Into<Rc<str>>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Returns `true` when both handles share one allocation.
    pub fn same_handle(&self, other: &EntityRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Null, AttrValue::Null) => true,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Number(a), AttrValue::Number(b)) => numbers_equal(a, b),
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::Array(a), AttrValue::Array(b)) => a == b,
            (AttrValue::Record(a), AttrValue::Record(b)) => a == b,
            (AttrValue::Entity(a), AttrValue::Entity(b)) => a == b,
            _ => false,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => matches!((a.as_u64(), b.as_u64()), (Some(x), Some(y)) if x == y),
    }
}

impl AttrValue {
    /// `None` for NaN and infinities, which `From<f64>` maps to `Null`.
    pub fn from_finite(f: f64) -> Option<Self> {
        Number::from_f64(f).map(AttrValue::Number)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Records with at least one key are the only values the path codec
    /// descends into.
    pub fn is_branch(&self) -> bool {
        matches!(self, AttrValue::Record(record) if !record.is_empty())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            AttrValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            AttrValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            AttrValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            AttrValue::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Converts to plain JSON. Entity references become their id string, so
    /// the conversion is lossy only for trees that embed live entities.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(n.clone()),
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Array(items) => Value::Array(items.iter().map(AttrValue::to_json).collect()),
            AttrValue::Record(record) => Value::Object(
                record
                    .iter()
                    .map(|(key, val)| (key.clone(), val.to_json()))
                    .collect(),
            ),
            AttrValue::Entity(entity) => Value::String(entity.id().to_string()),
        }
    }
}

/// Builds a record from a JSON object; any other JSON value yields an empty
/// record.
pub fn record(value: Value) -> Record {
    AttrValue::from(value).into_record().unwrap_or_default()
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::Number(n),
            Value::String(s) => AttrValue::String(s),
            Value::Array(items) => AttrValue::Array(items.into_iter().map(AttrValue::from).collect()),
            Value::Object(map) => AttrValue::Record(
                map.into_iter()
                    .map(|(key, val)| (key, AttrValue::from(val)))
                    .collect(),
            ),
        }
    }
}

impl From<&AttrValue> for Value {
    fn from(value: &AttrValue) -> Self {
        value.to_json()
    }
}

macro_rules! from_integer {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(n: $ty) -> Self {
                    AttrValue::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer! {
    i8 i16 i32 i64 isize
    u8 u16 u32 u64 usize
}

impl From<f64> for AttrValue {
    /// Non-finite floats have no JSON representation and become `Null`; use
    /// [`AttrValue::from_finite`] to reject them instead.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(AttrValue::Null, AttrValue::Number)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(items: Vec<AttrValue>) -> Self {
        AttrValue::Array(items)
    }
}

impl From<Record> for AttrValue {
    fn from(record: Record) -> Self {
        AttrValue::Record(record)
    }
}

impl From<EntityRef> for AttrValue {
    fn from(entity: EntityRef) -> Self {
        AttrValue::Entity(entity)
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Null => serializer.serialize_unit(),
            AttrValue::Bool(b) => serializer.serialize_bool(*b),
            AttrValue::Number(n) => n.serialize(serializer),
            AttrValue::String(s) => serializer.serialize_str(s),
            AttrValue::Array(items) => items.serialize(serializer),
            AttrValue::Record(record) => record.serialize(serializer),
            AttrValue::Entity(entity) => serializer.serialize_str(entity.id()),
        }
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AttrValue::from)
    }
}
