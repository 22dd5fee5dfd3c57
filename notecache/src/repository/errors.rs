use thiserror::Error;
use crate::storage::StoreError;

/// What the presentation layer gets back from a failed write.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("nobody is signed in")]
    Unauthenticated,

    #[error("could not save: {0}")]
    SaveFailed(#[source] StoreError),

    #[error("could not remove: {0}")]
    RemoveFailed(#[source] StoreError),
}
