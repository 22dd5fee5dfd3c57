
use async_trait::async_trait;
use log::debug;
use uuid::Uuid;
use crate::config::app_config::AppConfig;
use crate::data::NoteEntity;
use crate::lib_constants::NOTES_TABLE_FILE;
use crate::live_query::LiveQuery;
use crate::storage::StoreError;
use crate::storage::io_trait::{EphemeralTableIo, ProductionTableIo, TableIo};
use crate::storage::table::Table;
use crate::user_id::UserId;

const TABLE_NAME: &str = "notes";

/// Keyed storage of notes with a live per-user query.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes of `user_id`, most recently updated first. Never fails, an
    /// unknown user simply has no notes.
    fn observe_by_user(&self, user_id: &UserId) -> LiveQuery<NoteEntity>;

    async fn get(&self, id: Uuid) -> Option<NoteEntity>;

    /// Inserts the note or fully replaces the one with the same id.
    async fn insert(&self, entity: NoteEntity) -> Result<(), StoreError>;

    /// Same as [`NoteStore::insert`], for callers replacing a known note.
    async fn update(&self, entity: NoteEntity) -> Result<(), StoreError>;

    /// Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;
}

pub struct NoteStoreImpl<Io: TableIo<NoteEntity>> {
    table: Table<NoteEntity, Io>,
}

impl<Io: TableIo<NoteEntity>> NoteStoreImpl<Io> {
    pub async fn new_impl(
        io: Io,
        change_buffer_size: usize,
    ) -> Result<Self, StoreError> {
        Ok(
            NoteStoreImpl {
                table: Table::open(TABLE_NAME, io, change_buffer_size).await?,
            }
        )
    }

    #[cfg(test)]
    pub(crate) fn io(&self) -> &Io {
        self.table.io()
    }
}

#[async_trait]
impl<Io: TableIo<NoteEntity>> NoteStore for NoteStoreImpl<Io> {
    fn observe_by_user(&self, user_id: &UserId) -> LiveQuery<NoteEntity> {
        self.table.observe(user_id)
    }

    async fn get(&self, id: Uuid) -> Option<NoteEntity> {
        self.table.get(&id).await
    }

    async fn insert(&self, entity: NoteEntity) -> Result<(), StoreError> {
        debug!("inserting note {} for user \"{}\"", entity.id, entity.user_id);
        self.table.upsert(entity).await.map(drop)
    }

    async fn update(&self, entity: NoteEntity) -> Result<(), StoreError> {
        debug!("updating note {} for user \"{}\"", entity.id, entity.user_id);
        self.table.upsert(entity).await.map(drop)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.table.delete(&id).await.map(drop)
    }
}

pub type ProductionNoteStore = NoteStoreImpl<ProductionTableIo>;

impl ProductionNoteStore {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<ProductionNoteStore, StoreError> {
        Self::new_impl(
            ProductionTableIo::new(
                app_config.data_directory.join(NOTES_TABLE_FILE)
            ).await?,
            app_config.change_buffer_size,
        ).await
    }
}

pub type EphemeralNoteStore = NoteStoreImpl<EphemeralTableIo>;

impl EphemeralNoteStore {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<EphemeralNoteStore, StoreError> {
        Self::new_impl(EphemeralTableIo, app_config.change_buffer_size).await
    }
}
