use thiserror::Error;

/// Failures reported by a [`KeyValueStore`](crate::persistence::KeyValueStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Failed to write key {key:?}: {reason}")]
    Write { key: String, reason: String },
    #[error("Failed to read key {key:?}: {reason}")]
    Read { key: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Symbol catalog needs {required} distinct symbols, found {available}")]
    Configuration { required: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
