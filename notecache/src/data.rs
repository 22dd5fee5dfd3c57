use std::cmp::Ordering;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use crate::rng::make_uuid;
use crate::storage::Record;
use crate::user_id::UserId;

/// A note as it is persisted, owned by exactly one user.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NoteEntity {
    pub id: Uuid,
    pub user_id: UserId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A note as the presentation layer sees it: no ownership.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NoteView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NoteView {
    /// A note that has never been saved. Its timestamps are placeholders,
    /// the repository stamps real ones on save.
    pub fn draft(title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        NoteView {
            id: make_uuid(&mut rand::rng()),
            title: title.into(),
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_entity(
        self,
        user_id: UserId,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> NoteEntity {
        NoteEntity {
            id: self.id,
            user_id,
            title: self.title,
            body: self.body,
            created_at,
            updated_at,
        }
    }
}

impl From<NoteEntity> for NoteView {
    fn from(value: NoteEntity) -> Self {
        NoteView {
            id: value.id,
            title: value.title,
            body: value.body,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl Record for NoteEntity {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    // most recently updated first
    fn recency_cmp(&self, other: &Self) -> Ordering {
        other.updated_at.cmp(&self.updated_at)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    pub user_id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Profile fields as typed in by the user, before normalization.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub username: String,
    pub date_of_birth: String,
    pub gender: String,
}

impl From<&UserProfile> for ProfileDraft {
    fn from(value: &UserProfile) -> Self {
        ProfileDraft {
            name: value.name.clone().unwrap_or_default(),
            username: value.username.clone().unwrap_or_default(),
            date_of_birth: value.date_of_birth.clone().unwrap_or_default(),
            gender: value.gender.clone().unwrap_or_default(),
        }
    }
}

impl Record for UserProfile {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.user_id.clone()
    }

    fn owner(&self) -> &UserId {
        &self.user_id
    }

    fn recency_cmp(&self, other: &Self) -> Ordering {
        self.user_id.cmp(&other.user_id)
    }
}
