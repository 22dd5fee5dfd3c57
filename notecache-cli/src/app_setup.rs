use std::sync::Arc;
use log::info;
use notecache::auth::LocalAuth;
use notecache::clock::SystemClock;
use notecache::config::app_config::{AppConfig, StorageBackend};
use notecache::repository::{NoteRepository, ProfileRepository};
use notecache::storage::{EphemeralNoteStore, EphemeralProfileStore, NoteStore, ProductionNoteStore, ProductionProfileStore, ProfileStore, StoreError};
use notecache::user_id::UserId;

pub struct App {
    pub auth: Arc<LocalAuth>,
    pub notes: NoteRepository,
    pub profiles: ProfileRepository,
}

pub async fn make_app(
    app_config: &AppConfig,
    user: Option<UserId>,
) -> Result<App, StoreError> {
    let auth = Arc::new(LocalAuth::new());
    if let Some(user) = user {
        auth.sign_in(user);
    }

    let (note_store, profile_store): (Arc<dyn NoteStore>, Arc<dyn ProfileStore>) =
        match app_config.storage {
            StorageBackend::File => {
                info!(
                    "keeping notes in {}",
                    app_config.data_directory.display(),
                );
                (
                    Arc::new(ProductionNoteStore::new(app_config).await?),
                    Arc::new(ProductionProfileStore::new(app_config).await?),
                )
            },
            StorageBackend::Memory => {
                info!("keeping notes in memory, nothing will be saved");
                (
                    Arc::new(EphemeralNoteStore::new(app_config).await?),
                    Arc::new(EphemeralProfileStore::new(app_config).await?),
                )
            },
        };

    Ok(
        App {
            notes: NoteRepository::new(
                note_store,
                auth.clone(),
                Arc::new(SystemClock),
            ),
            profiles: ProfileRepository::new(profile_store, auth.clone()),
            auth,
        }
    )
}
