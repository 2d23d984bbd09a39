use axum::extract::FromRef;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token has no subject")]
    MissingSubject,
}

/// Verification key plus the rules every bearer token must satisfy.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub validation: Validation,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        // HMAC family only; anything else in the header is rejected by decode.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        match &cfg.audience {
            Some(aud) => validation.set_audience(std::slice::from_ref(aud)),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &cfg.issuer {
            validation.set_issuer(std::slice::from_ref(iss));
        }
        Self {
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
        }
    }

    /// Checks signature, algorithm and expiry, then returns the subject user id.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        let user_id = data
            .claims
            .subject()
            .ok_or(TokenError::MissingSubject)?
            .to_string();
        debug!(user_id = %user_id, alg = ?data.header.alg, "jwt verified");
        Ok(user_id)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;

    pub(crate) const TEST_SECRET: &str = "test-secret";

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    pub(crate) fn mint_with(alg: Algorithm, secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign token")
    }

    /// Token for `user_id` signed with the test secret, valid for an hour.
    pub(crate) fn mint(user_id: &str) -> String {
        mint_with(
            Algorithm::HS256,
            TEST_SECRET,
            json!({ "user_id": user_id, "iat": now(), "exp": now() + 3600 }),
        )
    }

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: TEST_SECRET.into(),
            issuer: None,
            audience: None,
        })
    }

    #[test]
    fn valid_token_yields_subject() {
        let token = mint("user-123");
        assert_eq!(keys().validate(&token).expect("valid token"), "user-123");
    }

    #[test]
    fn registered_sub_is_accepted() {
        let token = mint_with(
            Algorithm::HS384,
            TEST_SECRET,
            json!({ "sub": "user-9", "exp": now() + 60 }),
        );
        assert_eq!(keys().validate(&token).expect("valid token"), "user-9");
    }

    #[test]
    fn hs512_is_accepted() {
        let token = mint_with(
            Algorithm::HS512,
            TEST_SECRET,
            json!({ "user_id": "u", "exp": now() + 60 }),
        );
        assert!(keys().validate(&token).is_ok());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = mint("user-123");
        let (head, sig) = token.rsplit_once('.').expect("three segments");
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);
        assert!(matches!(
            keys().validate(&tampered),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint_with(
            Algorithm::HS256,
            "another-secret",
            json!({ "user_id": "u", "exp": now() + 60 }),
        );
        assert!(keys().validate(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = mint_with(
            Algorithm::HS256,
            TEST_SECRET,
            json!({ "user_id": "u", "exp": now() - 3600 }),
        );
        assert!(keys().validate(&token).is_err());
    }

    #[test]
    fn token_without_exp_is_rejected() {
        let token = mint_with(Algorithm::HS256, TEST_SECRET, json!({ "user_id": "u" }));
        assert!(keys().validate(&token).is_err());
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let token = mint_with(Algorithm::HS256, TEST_SECRET, json!({ "exp": now() + 60 }));
        assert!(matches!(
            keys().validate(&token),
            Err(TokenError::MissingSubject)
        ));
    }

    #[test]
    fn unsigned_token_is_rejected() {
        // {"alg":"none","typ":"JWT"}
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let token = mint("user-123");
        let payload = token.split('.').nth(1).expect("payload");
        assert!(keys().validate(&format!("{header}.{payload}.")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(keys().validate("not-a-jwt").is_err());
    }

    #[test]
    fn configured_issuer_is_enforced() {
        let keys = JwtKeys::new(&JwtConfig {
            secret: TEST_SECRET.into(),
            issuer: Some("auth-service".into()),
            audience: None,
        });
        let good = mint_with(
            Algorithm::HS256,
            TEST_SECRET,
            json!({ "user_id": "u", "iss": "auth-service", "exp": now() + 60 }),
        );
        let bad = mint_with(
            Algorithm::HS256,
            TEST_SECRET,
            json!({ "user_id": "u", "iss": "elsewhere", "exp": now() + 60 }),
        );
        assert!(keys.validate(&good).is_ok());
        assert!(keys.validate(&bad).is_err());
    }
}
