use std::sync::Arc;
use log::{error, warn};
use crate::auth::AuthProvider;
use crate::data::{ProfileDraft, UserProfile};
use crate::live_query::LiveQuery;
use crate::repository::RepositoryError;
use crate::storage::ProfileStore;
use crate::user_id::UserId;
use crate::util::StrExt;

pub struct ProfileRepository {
    store: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthProvider>,
}

impl ProfileRepository {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        ProfileRepository {
            store,
            auth,
        }
    }

    /// Yields `None` until the user saves a profile.
    pub fn profile_for(&self, user_id: &UserId) -> LiveQuery<Option<UserProfile>> {
        self.store.observe(user_id)
    }

    /// Replaces the signed in user's profile. Blank fields are stored as
    /// absent.
    pub async fn save(&self, draft: ProfileDraft) -> Result<UserProfile, RepositoryError> {
        let Some(user_id) = self.auth.current_user_id() else {
            warn!("not saving a profile while nobody is signed in");
            return Err(RepositoryError::Unauthenticated)
        };
        let profile = UserProfile {
            user_id,
            name: draft.name.nonblank_to_some(),
            username: draft.username.nonblank_to_some(),
            date_of_birth: draft.date_of_birth.nonblank_to_some(),
            gender: draft.gender.nonblank_to_some(),
        };
        match self.store.upsert(profile.clone()).await {
            Ok(()) => Ok(profile),
            Err(e) => {
                error!("saving profile of user \"{}\" failed: {e}", profile.user_id);
                Err(RepositoryError::SaveFailed(e))
            },
        }
    }

    pub async fn exists(&self, user_id: &UserId) -> bool {
        self.store.exists(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::LocalAuth;
    use crate::storage::ProfileStoreImpl;
    use crate::storage::mocks::TestTableIo;
    use crate::testing::*;
    use super::*;

    async fn fixture() -> (
        Arc<ProfileStoreImpl<TestTableIo<UserProfile>>>,
        Arc<LocalAuth>,
        ProfileRepository,
    ) {
        let store = Arc::new(
            ProfileStoreImpl::new_impl(TestTableIo::new(), 16)
                .await
                .expect("store creation failed")
        );
        let auth = Arc::new(LocalAuth::signed_in(user("u1")));
        let repository = ProfileRepository::new(store.clone(), auth.clone());
        (store, auth, repository)
    }

    #[tokio::test]
    async fn save_stamps_the_user_and_drops_blank_fields() {
        let (_store, _auth, repository) = fixture().await;
        let mut query = repository.profile_for(&user("u1"));
        assert_eq!(next_snapshot(&mut query).await, vec![None]);
        assert!(!repository.exists(&user("u1")).await);

        let saved = repository.save(ProfileDraft {
            name: " Ann ".into(),
            username: "   ".into(),
            ..ProfileDraft::default()
        }).await.expect("save failed");
        assert_eq!(saved.user_id, user("u1"));
        assert_eq!(saved.name.as_deref(), Some("Ann"));
        assert_eq!(saved.username, None);
        assert_eq!(saved.gender, None);

        assert_eq!(next_snapshot(&mut query).await, vec![Some(saved)]);
        assert!(repository.exists(&user("u1")).await);
    }

    #[tokio::test]
    async fn editing_starts_from_the_stored_profile() {
        let (_store, _auth, repository) = fixture().await;
        let saved = repository.save(ProfileDraft {
            gender: "f".into(),
            ..ProfileDraft::default()
        }).await.unwrap();
        let mut draft = ProfileDraft::from(&saved);
        draft.name = "Ann".into();
        let saved = repository.save(draft).await.unwrap();
        assert_eq!(saved.gender.as_deref(), Some("f"));
        assert_eq!(saved.name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn save_without_a_user_fails() {
        let (store, auth, repository) = fixture().await;
        auth.sign_out();
        let err = repository.save(ProfileDraft::default()).await.expect_err("should fail");
        assert!(matches!(err, RepositoryError::Unauthenticated), "wrong error type: {err:#?}");
        assert_eq!(store.io().write_attempts(), 0);
    }

    #[tokio::test]
    async fn medium_failure_is_a_failed_save() {
        let (store, _auth, repository) = fixture().await;
        store.io().set_fail_writes(true);
        let err = repository.save(ProfileDraft::default()).await.expect_err("should fail");
        assert!(matches!(err, RepositoryError::SaveFailed(_)), "wrong error type: {err:#?}");
        assert!(!repository.exists(&user("u1")).await);
    }
}
