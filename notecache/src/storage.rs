mod errors;
pub mod io_trait;
mod note_store;
mod profile_store;
mod table;
#[cfg(test)] pub(crate) mod mocks;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use serde::Serialize;
use serde::de::DeserializeOwned;
use crate::user_id::UserId;

pub use errors::*;
pub use note_store::{EphemeralNoteStore, NoteStore, NoteStoreImpl, ProductionNoteStore};
pub use profile_store::{EphemeralProfileStore, ProductionProfileStore, ProfileStore, ProfileStoreImpl};

/// A row of a user-scoped table.
pub trait Record: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Key: Clone + Debug + Display + Eq + Hash + Send + Sync + 'static;

    fn key(&self) -> Self::Key;

    fn owner(&self) -> &UserId;

    /// Order of rows in a query result.
    fn recency_cmp(&self, other: &Self) -> Ordering;
}
