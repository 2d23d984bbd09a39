use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordPolicy {
    pub bcrypt_cost: u32,
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            min_length: 6,
        }
    }
}

/// Which key-value backend holds profiles and auth records.
#[derive(Debug, Clone, Deserialize)]
pub enum StoreConfig {
    Memory,
    Postgres {
        database_url: String,
    },
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub password: PasswordPolicy,
    pub store: StoreConfig,
    pub profile_namespace: String,
    pub account_namespace: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: non_empty_var("JWT_ISSUER"),
            audience: non_empty_var("JWT_AUDIENCE"),
        };

        let defaults = PasswordPolicy::default();
        let bcrypt_cost: u32 = parse_setting(
            "BCRYPT_COST",
            std::env::var("BCRYPT_COST").ok(),
            defaults.bcrypt_cost,
        )?;
        anyhow::ensure!(
            (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost),
            "BCRYPT_COST must be between {} and {}",
            MIN_BCRYPT_COST,
            MAX_BCRYPT_COST
        );
        let password = PasswordPolicy {
            bcrypt_cost,
            min_length: parse_setting(
                "PASSWORD_MIN_LENGTH",
                std::env::var("PASSWORD_MIN_LENGTH").ok(),
                defaults.min_length,
            )?,
        };

        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".into());
        let store = match backend.to_lowercase().as_str() {
            "memory" => StoreConfig::Memory,
            "postgres" => StoreConfig::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .context("DATABASE_URL must be set for the postgres backend")?,
            },
            "s3" => StoreConfig::S3 {
                endpoint: std::env::var("S3_ENDPOINT").context("S3_ENDPOINT must be set")?,
                bucket: std::env::var("S3_BUCKET").context("S3_BUCKET must be set")?,
                access_key: std::env::var("S3_ACCESS_KEY").context("S3_ACCESS_KEY must be set")?,
                secret_key: std::env::var("S3_SECRET_KEY").context("S3_SECRET_KEY must be set")?,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            },
            other => anyhow::bail!("unknown STORE_BACKEND {other:?} (expected memory, postgres or s3)"),
        };

        Ok(Self {
            jwt,
            password,
            store,
            profile_namespace: std::env::var("PROFILE_NAMESPACE").unwrap_or_else(|_| "data".into()),
            account_namespace: std::env::var("ACCOUNT_NAMESPACE")
                .unwrap_or_else(|_| "usersdata".into()),
        })
    }
}

/// Unset or blank falls back to `default`; anything else must parse.
fn parse_setting<T>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) => v
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got {v:?}")),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
