use anyhow::Context;
use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::storage::KvStore;

pub const ACCOUNT_BY_ID_PREFIX: &str = "/users/id/";
pub const ACCOUNT_BY_USERNAME_PREFIX: &str = "/users/";

pub fn account_id_key(user_id: &str) -> String {
    format!("{}{}", ACCOUNT_BY_ID_PREFIX, user_id)
}

pub fn account_username_key(username: &str) -> String {
    format!("{}{}", ACCOUNT_BY_USERNAME_PREFIX, username)
}

/// Sets `password` on both copies of the auth record.
///
/// The record is owned by the auth service, so every other field is carried
/// through untouched. The id-keyed copy is written first; if the
/// username-keyed write then fails, the id-keyed copy is restored.
pub async fn update_password(
    store: &dyn KvStore,
    user_id: &str,
    password_hash: &str,
) -> anyhow::Result<()> {
    let id_key = account_id_key(user_id);
    let previous = store
        .get(&id_key)
        .await
        .with_context(|| format!("get {}", id_key))?;

    let mut record: Map<String, Value> =
        serde_json::from_slice(&previous).with_context(|| format!("decode auth record {}", id_key))?;

    let username = record
        .get("username")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .with_context(|| format!("auth record {} has no username", id_key))?;

    record.insert("password".into(), Value::String(password_hash.to_string()));
    let updated = Bytes::from(serde_json::to_vec(&record).context("encode auth record")?);

    store
        .put(&id_key, updated.clone())
        .await
        .with_context(|| format!("put {}", id_key))?;

    let username_key = account_username_key(&username);
    if let Err(e) = store.put(&username_key, updated).await {
        warn!(user_id = %user_id, error = %e, "username copy write failed, restoring id copy");
        if let Err(rollback) = store.put(&id_key, previous).await {
            error!(user_id = %user_id, error = %rollback, "auth record copies diverged");
        }
        return Err(e).with_context(|| format!("put {}", username_key));
    }
    Ok(())
}
