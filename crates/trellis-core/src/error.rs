use thiserror::Error;

/// Configuration contract violations. These are raised to the caller at the
/// point of configuration; runtime conditions such as a missing measurement or
/// an empty item list are ordinary states, not errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("a data table needs at least one column")]
    NoColumns,

    #[error("column key `{0}` is used more than once")]
    DuplicateColumnKey(String),

    #[error("invalid `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
