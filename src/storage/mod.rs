//! Key-value adapter for profile and auth records.
//!
//! Records are opaque bytes addressed by string paths such as
//! `/users/profiles/<id>`. Each backend keeps a namespace so that the
//! profile store and the account store never see each other's keys.

use async_trait::async_trait;
use bytes::Bytes;

mod memory;
mod postgres;
mod s3;

pub use memory::MemoryStore;
pub use postgres::PgKvStore;
pub use s3::S3KvStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("key not found: {key}")]
    NotFound { key: String },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(key: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;
    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError>;
}
