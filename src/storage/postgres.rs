use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use sqlx::PgPool;

use super::{KvStore, StoreError};

/// Key-value rows in the `kv_entries` table, scoped by namespace.
#[derive(Clone)]
pub struct PgKvStore {
    db: PgPool,
    namespace: String,
}

impl PgKvStore {
    pub fn new(db: PgPool, namespace: &str) -> Self {
        Self {
            db,
            namespace: namespace.to_string(),
        }
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let value = sqlx::query_scalar::<_, Vec<u8>>(
            r#"
            SELECT value
              FROM kv_entries
             WHERE namespace = $1 AND key = $2
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("select kv entry {}{}", self.namespace, key))?;

        value
            .map(Bytes::from)
            .ok_or_else(|| StoreError::not_found(key))
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (namespace, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value.as_ref())
        .execute(&self.db)
        .await
        .with_context(|| format!("upsert kv entry {}{}", self.namespace, key))?;
        Ok(())
    }
}
