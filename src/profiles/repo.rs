use anyhow::Context;
use bytes::Bytes;

use crate::profiles::repo_types::Profile;
use crate::storage::{KvStore, StoreError};

pub const PROFILE_PREFIX: &str = "/users/profiles/";

pub fn profile_key(id: &str) -> String {
    format!("{}{}", PROFILE_PREFIX, id)
}

impl Profile {
    /// Find a profile by user id; `None` when nothing is stored yet.
    pub async fn find(store: &dyn KvStore, id: &str) -> anyhow::Result<Option<Profile>> {
        let key = profile_key(id);
        let raw = match store.get(&key).await {
            Ok(raw) => raw,
            Err(StoreError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("get {}", key)),
        };
        let profile = serde_json::from_slice(&raw)
            .with_context(|| format!("decode profile at {}", key))?;
        Ok(Some(profile))
    }

    /// Write the whole record, replacing whatever was there.
    pub async fn save(&self, store: &dyn KvStore) -> anyhow::Result<()> {
        let key = profile_key(&self.id);
        let raw = serde_json::to_vec(self).context("encode profile")?;
        store
            .put(&key, Bytes::from(raw))
            .await
            .with_context(|| format!("put {}", key))
    }
}
