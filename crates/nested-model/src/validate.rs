//! Validation gate.
//!
//! A [`Validator`] sees the prospective tree (live state with the pending
//! update overlaid) and may veto the mutation. Rejections never touch live
//! state; they are cached on the model and announced as `invalid`.

use nested_attrs::Record;

use crate::options::SetOptions;

/// Error returned by a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Attribute the error is about, when it concerns a single path.
    pub path: Option<String>,
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

pub trait Validator {
    fn validate(&self, attrs: &Record, options: &SetOptions) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Record, &SetOptions) -> Result<(), ValidationError>,
{
    fn validate(&self, attrs: &Record, options: &SetOptions) -> Result<(), ValidationError> {
        self(attrs, options)
    }
}
