use thiserror::Error;

/// Returned by [`Hashtable::delete`](crate::Hashtable::delete).
///
/// Both cases are recoverable. The table reports them and leaves its
/// contents untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteError {
    #[error("key {0:?} not found")]
    NotFound(String),
    #[error("key {0:?} was already deleted")]
    AlreadyDeleted(String),
}

/// Rejected construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    #[error("load factor must lie strictly between 0 and 1, got {0}")]
    LoadFactorOutOfRange(f64),
    #[error("growth factor must be finite and greater than 1, got {0}")]
    GrowthFactorTooSmall(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("text must contain at least one character")]
    EmptyText,
    #[error("count table must start empty, it holds {0} entries")]
    TableNotEmpty(usize),
    #[error("count table must read absent keys as 0, its default is {0}")]
    NonZeroDefault(u64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
