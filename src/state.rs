use std::sync::Arc;

use anyhow::Context;

use crate::auth::JwtKeys;
use crate::config::{AppConfig, StoreConfig};
use crate::storage::{KvStore, MemoryStore, PgKvStore, S3KvStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub profiles: Arc<dyn KvStore>,
    pub accounts: Arc<dyn KvStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let (profiles, accounts): (Arc<dyn KvStore>, Arc<dyn KvStore>) = match &config.store {
            StoreConfig::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                (Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
            }
            StoreConfig::Postgres { database_url } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                (
                    Arc::new(PgKvStore::new(db.clone(), &config.profile_namespace)),
                    Arc::new(PgKvStore::new(db, &config.account_namespace)),
                )
            }
            StoreConfig::S3 {
                endpoint,
                bucket,
                access_key,
                secret_key,
                region,
            } => {
                let client =
                    S3KvStore::connect(endpoint, access_key, secret_key, region).await?;
                (
                    Arc::new(S3KvStore::new(client.clone(), bucket, &config.profile_namespace)),
                    Arc::new(S3KvStore::new(client, bucket, &config.account_namespace)),
                )
            }
        };

        Ok(Self::from_parts(Arc::new(config), profiles, accounts))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        profiles: Arc<dyn KvStore>,
        accounts: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            jwt: JwtKeys::new(&config.jwt),
            config,
            profiles,
            accounts,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, PasswordPolicy};

        let config = Arc::new(AppConfig {
            jwt: JwtConfig {
                secret: crate::auth::jwt::tests::TEST_SECRET.into(),
                issuer: None,
                audience: None,
            },
            password: PasswordPolicy {
                bcrypt_cost: 4,
                min_length: 6,
            },
            store: StoreConfig::Memory,
            profile_namespace: "data".into(),
            account_namespace: "usersdata".into(),
        });

        Self::from_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
    }
}
