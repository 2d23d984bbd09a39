use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;

use super::{KvStore, StoreError};

/// Records kept as S3/MinIO objects under `<namespace><key>`.
#[derive(Clone)]
pub struct S3KvStore {
    client: Client,
    bucket: String,
    namespace: String,
}

impl S3KvStore {
    pub async fn connect(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Client> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Client::from_conf(conf))
    }

    pub fn new(client: Client, bucket: &str, namespace: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            namespace: namespace.trim_end_matches('/').to_string(),
        }
    }

    fn object_key(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.namespace, key)
        }
    }
}

#[async_trait]
impl KvStore for S3KvStore {
    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let object_key = self.object_key(key);
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_key()) =>
            {
                return Err(StoreError::not_found(key));
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("s3 get_object {}", object_key))
                    .into());
            }
        };

        let data = output
            .body
            .collect()
            .await
            .with_context(|| format!("s3 read body {}", object_key))?;
        Ok(data.into_bytes())
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let object_key = self.object_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(value))
            .content_type("application/json")
            .send()
            .await
            .with_context(|| format!("s3 put_object {}", object_key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(namespace: &str) -> S3KvStore {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3KvStore::new(Client::from_conf(conf), "bucket", namespace)
    }

    #[test]
    fn object_key_is_scoped_by_namespace() {
        let s = store("usersdata/");
        assert_eq!(s.object_key("/users/id/42"), "usersdata/users/id/42");
    }

    #[test]
    fn object_key_without_namespace() {
        let s = store("");
        assert_eq!(s.object_key("/users/profiles/42"), "users/profiles/42");
    }
}
