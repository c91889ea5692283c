use serde::{Deserialize, Serialize};

/// Per-call flags for [`Model::apply`](crate::Model::apply).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    /// Remove every touched path instead of writing it.
    pub unset: bool,
    /// Suppress attribute, wildcard and `change` events for this call.
    pub silent: bool,
    /// Run the configured validator before mutating.
    pub validate: bool,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unset(mut self) -> Self {
        self.unset = true;
        self
    }

    pub fn with_silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn with_validate(mut self) -> Self {
        self.validate = true;
        self
    }
}
