//! # Session repository: the signed-in user on top of a key/value store
//!
//! [`SessionRepository`] reads and writes a [`SessionRecord`] through the
//! [`KeyValueStore`] trait, so the same logic works against browser
//! `localStorage` ([`crate::LocalStorageStore`]), a JSON file on desktop
//! ([`crate::FileStore`]) or memory ([`crate::MemoryStore`]).
//!
//! ## [`KeyValueStore`] trait
//!
//! An async interface with two methods, `get_item`/`set_item`, keyed by string
//! and holding string values (the shape of the Web Storage API).
//!
//! ## Write ordering
//!
//! [`save`](SessionRepository::save) encodes the user info before touching the
//! store, then writes `"uid"` followed by `"userInfo"`. Existing values are
//! overwritten unconditionally. The two writes are not atomic.

use crate::error::StoreError;
use crate::models::{SessionRecord, UserInfo, UID_KEY, USER_INFO_KEY};

/// Async trait for string key/value persistence.
pub trait KeyValueStore {
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Session record persistence backed by a KeyValueStore.
pub struct SessionRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist a session record, replacing whatever was stored before.
    pub async fn save(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let user_info = serde_json::to_string(&record.user_info)?;
        self.store.set_item(UID_KEY, &record.uid).await?;
        self.store.set_item(USER_INFO_KEY, &user_info).await?;
        tracing::debug!(uid = %record.uid, "session record written");
        Ok(())
    }

    /// Load the persisted session record, if both keys are present.
    pub async fn load(&self) -> Result<Option<SessionRecord>, StoreError> {
        let Some(uid) = self.store.get_item(UID_KEY).await? else {
            return Ok(None);
        };
        let Some(raw) = self.store.get_item(USER_INFO_KEY).await? else {
            tracing::warn!(%uid, "session has a uid but no userInfo");
            return Ok(None);
        };
        let user_info: UserInfo = serde_json::from_str(&raw)?;
        Ok(Some(SessionRecord { uid, user_info }))
    }
}
