use std::io::Error as IoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] MediumError),
}

/// Failure of the medium a table is persisted to.
#[derive(Debug, Error)]
pub enum MediumError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("invalid table contents: {0}")]
    Parsing(#[from] toml::de::Error),

    #[error("serializing the table failed: {0}")]
    Serialization(#[from] toml::ser::Error),
}

impl From<IoError> for StoreError {
    fn from(value: IoError) -> Self {
        StoreError::StorageUnavailable(value.into())
    }
}
