use nested_attrs::AttrValue;

use crate::options::SetOptions;
use crate::validate::ValidationError;

pub const CHANGE: &str = "change";
pub const INVALID: &str = "invalid";

/// `change:<path>`
pub fn attribute_event_name(path: &str) -> String {
    format!("{CHANGE}:{path}")
}

/// `change:<parent>.*`
pub fn wildcard_event_name(parent: &str) -> String {
    format!("{CHANGE}:{parent}.*")
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A leaf changed during one `apply` call. `value` is the live value at
    /// emission time, `None` once removed.
    Attribute {
        path: String,
        value: Option<AttrValue>,
        options: SetOptions,
    },
    /// Something beneath `parent` changed.
    Wildcard {
        parent: String,
        value: Option<AttrValue>,
        options: SetOptions,
    },
    /// One settled announcement of a burst.
    Change { options: SetOptions },
    Invalid {
        error: ValidationError,
        options: SetOptions,
    },
}

impl ChangeEvent {
    pub fn name(&self) -> String {
        match self {
            ChangeEvent::Attribute { path, .. } => attribute_event_name(path),
            ChangeEvent::Wildcard { parent, .. } => wildcard_event_name(parent),
            ChangeEvent::Change { .. } => CHANGE.to_string(),
            ChangeEvent::Invalid { .. } => INVALID.to_string(),
        }
    }

    pub fn options(&self) -> &SetOptions {
        match self {
            ChangeEvent::Attribute { options, .. }
            | ChangeEvent::Wildcard { options, .. }
            | ChangeEvent::Change { options }
            | ChangeEvent::Invalid { options, .. } => options,
        }
    }

    /// Value carried by attribute and wildcard events.
    pub fn value(&self) -> Option<&AttrValue> {
        match self {
            ChangeEvent::Attribute { value, .. } | ChangeEvent::Wildcard { value, .. } => value.as_ref(),
            _ => None,
        }
    }
}
