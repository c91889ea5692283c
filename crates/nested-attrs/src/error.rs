use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty attribute path")]
    EmptyPath,

    /// A write would have to descend through a value that is not a record.
    #[error("cannot descend into non-record value at `{path}`")]
    NotARecord { path: String },
}
