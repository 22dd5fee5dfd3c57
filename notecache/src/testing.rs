use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;
use futures::StreamExt;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;
use crate::clock::Clock;
use crate::data::NoteEntity;
use crate::live_query::LiveQuery;
use crate::user_id::UserId;

pub const START_TIME: OffsetDateTime = datetime!(2024-03-01 09:00 UTC);

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::at(START_TIME)
    }

    pub fn at(now: OffsetDateTime) -> Self {
        ManualClock {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: time::Duration) {
        *self.now.lock().unwrap() += by;
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

pub fn user(id: &str) -> UserId {
    UserId::from_str(id).expect("invalid test user id")
}

pub fn note_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn note_entity(
    id: u128,
    owner: &str,
    body: &str,
    updated_at: OffsetDateTime,
) -> NoteEntity {
    NoteEntity {
        id: note_id(id),
        user_id: user(owner),
        title: String::new(),
        body: body.to_owned(),
        created_at: START_TIME,
        updated_at,
    }
}

const SNAPSHOT_WAIT: Duration = Duration::from_secs(5);
const QUIET_WAIT: Duration = Duration::from_millis(50);

pub async fn next_snapshot<T: Send + 'static>(query: &mut LiveQuery<T>) -> Vec<T> {
    tokio::time::timeout(SNAPSHOT_WAIT, query.next())
        .await
        .expect("no snapshot arrived in time")
        .expect("live query ended")
}

pub async fn assert_quiet<T: Send + std::fmt::Debug + 'static>(query: &mut LiveQuery<T>) {
    if let Ok(snapshot) = tokio::time::timeout(QUIET_WAIT, query.next()).await {
        panic!("unexpected snapshot: {snapshot:?}");
    }
}
