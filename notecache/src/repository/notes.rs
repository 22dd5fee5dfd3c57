
use std::sync::Arc;
use log::{debug, error, warn};
use uuid::Uuid;
use crate::auth::AuthProvider;
use crate::clock::Clock;
use crate::data::NoteView;
use crate::live_query::LiveQuery;
use crate::repository::RepositoryError;
use crate::storage::NoteStore;
use crate::user_id::UserId;

/// Maps between [`NoteView`]s and stored notes, stamping the owner and the
/// timestamps on the way in.
pub struct NoteRepository {
    store: Arc<dyn NoteStore>,
    auth: Arc<dyn AuthProvider>,
    clock: Arc<dyn Clock>,
}

impl NoteRepository {
    pub fn new(
        store: Arc<dyn NoteStore>,
        auth: Arc<dyn AuthProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        NoteRepository {
            store,
            auth,
            clock,
        }
    }

    pub fn notes_for(&self, user_id: &UserId) -> LiveQuery<NoteView> {
        self.store.observe_by_user(user_id).map(NoteView::from)
    }

    /// Notes of whoever is signed in now. Nobody signed in reads as no notes.
    pub fn current_notes(&self) -> LiveQuery<NoteView> {
        match self.auth.current_user_id() {
            Some(user_id) => self.notes_for(&user_id),
            None => {
                debug!("nobody is signed in, no notes to show");
                LiveQuery::constant(Vec::new())
            },
        }
    }

    pub async fn save(&self, view: NoteView) -> Result<NoteView, RepositoryError> {
        let current_user_id = self.auth.current_user_id();
        self.save_for(view, current_user_id.as_ref()).await
    }

    /// Stores `view` as a note of `current_user_id` and returns what was
    /// stored.
    ///
    /// A note seen for the first time is created now, a known one keeps its
    /// creation time. Either way it is updated now.
    pub async fn save_for(
        &self,
        view: NoteView,
        current_user_id: Option<&UserId>,
    ) -> Result<NoteView, RepositoryError> {
        let Some(user_id) = current_user_id else {
            warn!("not saving note {} while nobody is signed in", view.id);
            return Err(RepositoryError::Unauthenticated)
        };
        let now = self.clock.now();
        let previous = self.store.get(view.id).await;
        let is_new = previous.is_none();
        let created_at = previous.map_or(now, |previous| previous.created_at);
        // a clock that went backwards must not date an update before creation
        let updated_at = now.max(created_at);
        let entity = view.into_entity(user_id.clone(), created_at, updated_at);

        let result = if is_new {
            self.store.insert(entity.clone()).await
        } else {
            self.store.update(entity.clone()).await
        };
        match result {
            Ok(()) => Ok(entity.into()),
            Err(e) => {
                error!("saving note {} of user \"{user_id}\" failed: {e}", entity.id);
                Err(RepositoryError::SaveFailed(e))
            },
        }
    }

    /// Removes the note if it exists. The outcome is informational, a failed
    /// removal is already logged.
    ///
    /// Any signed in user may remove any id. Callers that must respect
    /// ownership look the note up with [`NoteRepository::note`] first.
    pub async fn remove(&self, id: Uuid) -> Result<(), RepositoryError> {
        if self.auth.current_user_id().is_none() {
            warn!("not removing note {id} while nobody is signed in");
            return Err(RepositoryError::Unauthenticated)
        }
        self.store
            .delete_by_id(id)
            .await
            .map_err(|e| {
                error!("removing note {id} failed: {e}");
                RepositoryError::RemoveFailed(e)
            })
    }

    /// The signed in user's note with this id.
    pub async fn note(&self, id: Uuid) -> Option<NoteView> {
        let user_id = self.auth.current_user_id()?;
        self.store
            .get(id)
            .await
            .filter(|entity| entity.user_id == user_id)
            .map(NoteView::from)
    }
}
