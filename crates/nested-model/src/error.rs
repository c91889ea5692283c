use nested_attrs::PathError;
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The validator vetoed the update; live state is untouched.
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationError),
    /// The update would have to write through a non-record value.
    #[error("attribute path conflict: {0}")]
    Path(#[from] PathError),
}
