use async_trait::async_trait;
use log::debug;
use crate::config::app_config::AppConfig;
use crate::data::UserProfile;
use crate::lib_constants::PROFILES_TABLE_FILE;
use crate::live_query::LiveQuery;
use crate::storage::StoreError;
use crate::storage::io_trait::{EphemeralTableIo, ProductionTableIo, TableIo};
use crate::storage::table::Table;
use crate::user_id::UserId;

const TABLE_NAME: &str = "profiles";

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Every snapshot holds exactly one item: the user's profile, or `None`
    /// while there is none.
    fn observe(&self, user_id: &UserId) -> LiveQuery<Option<UserProfile>>;

    async fn get(&self, user_id: &UserId) -> Option<UserProfile>;

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError>;

    async fn exists(&self, user_id: &UserId) -> bool;
}

pub struct ProfileStoreImpl<Io: TableIo<UserProfile>> {
    table: Table<UserProfile, Io>,
}

impl<Io: TableIo<UserProfile>> ProfileStoreImpl<Io> {
    pub async fn new_impl(
        io: Io,
        change_buffer_size: usize,
    ) -> Result<Self, StoreError> {
        Ok(
            ProfileStoreImpl {
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
impl<Io: TableIo<UserProfile>> ProfileStore for ProfileStoreImpl<Io> {
    fn observe(&self, user_id: &UserId) -> LiveQuery<Option<UserProfile>> {
        let profiles = self.table.observe(user_id);
        // one row per user at most
        LiveQuery::new(
            futures::StreamExt::map(profiles, |snapshot| {
                vec![snapshot.into_iter().next()]
            })
        )
    }

    async fn get(&self, user_id: &UserId) -> Option<UserProfile> {
        self.table.get(user_id).await
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), StoreError> {
        debug!("saving profile of user \"{}\"", profile.user_id);
        self.table.upsert(profile).await.map(drop)
    }

    async fn exists(&self, user_id: &UserId) -> bool {
        self.table.contains(user_id).await
    }
}

pub type ProductionProfileStore = ProfileStoreImpl<ProductionTableIo>;

impl ProductionProfileStore {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<ProductionProfileStore, StoreError> {
        Self::new_impl(
            ProductionTableIo::new(
                app_config.data_directory.join(PROFILES_TABLE_FILE)
            ).await?,
            app_config.change_buffer_size,
        ).await
    }
}

pub type EphemeralProfileStore = ProfileStoreImpl<EphemeralTableIo>;

impl EphemeralProfileStore {
    pub async fn new(
        app_config: &AppConfig,
    ) -> Result<EphemeralProfileStore, StoreError> {
        Self::new_impl(EphemeralTableIo, app_config.change_buffer_size).await
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::mocks::TestTableIo;
    use crate::testing::*;
    use super::*;

    fn profile(owner: &str, name: Option<&str>) -> UserProfile {
        UserProfile {
            user_id: user(owner),
            name: name.map(str::to_owned),
            username: None,
            date_of_birth: None,
            gender: None,
        }
    }

    async fn make_store() -> ProfileStoreImpl<TestTableIo<UserProfile>> {
        ProfileStoreImpl::new_impl(TestTableIo::new(), 16)
            .await
            .expect("store creation failed")
    }

    #[tokio::test]
    async fn observe_missing_profile_is_none() {
        let store = make_store().await;
        let mut query = store.observe(&user("u1"));
        assert_eq!(next_snapshot(&mut query).await, vec![None]);
        assert!(!store.exists(&user("u1")).await);
    }

    #[tokio::test]
    async fn upsert_replaces_and_notifies() {
        let store = make_store().await;
        let mut query = store.observe(&user("u1"));
        next_snapshot(&mut query).await;

        store.upsert(profile("u1", Some("Ann"))).await.unwrap();
        assert_eq!(next_snapshot(&mut query).await, vec![Some(profile("u1", Some("Ann")))]);
        store.upsert(profile("u1", None)).await.unwrap();
        assert_eq!(next_snapshot(&mut query).await, vec![Some(profile("u1", None))]);

        assert!(store.exists(&user("u1")).await);
        assert_eq!(store.get(&user("u1")).await, Some(profile("u1", None)));
        assert_eq!(store.io().last_write().map(|rows| rows.len()), Some(1));
    }

    #[tokio::test]
    async fn other_users_profiles_stay_invisible() {
        let store = make_store().await;
        let mut query = store.observe(&user("u1"));
        next_snapshot(&mut query).await;
        store.upsert(profile("u2", Some("Bob"))).await.unwrap();
        assert_quiet(&mut query).await;
        assert!(!store.exists(&user("u1")).await);
    }

    #[tokio::test]
    async fn every_snapshot_holds_one_item() {
        let store = make_store().await;
        let mut query = store.observe(&user("u1"));
        assert_eq!(next_snapshot(&mut query).await.len(), 1);
        store.upsert(profile("u1", Some("Ann"))).await.unwrap();
        store.upsert(profile("u1", Some("Bea"))).await.unwrap();
        for _ in 0..2 {
            let snapshot = next_snapshot(&mut query).await;
            assert_eq!(snapshot.len(), 1, "{snapshot:?}");
            assert!(snapshot[0].is_some());
        }
    }
}
