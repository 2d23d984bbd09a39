use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Query, Request},
    http::{header::AUTHORIZATION, request::Parts, Uri},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Authenticated caller whose token subject equals the `id` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser(pub String);

/// First value of `name` in the query string; later repeats are ignored.
fn first_query_value(uri: &Uri, name: &str) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token_user = authenticate(parts, &JwtKeys::from_ref(state))?;

        let requested = first_query_value(&parts.uri, "id")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::BadRequest("missing or invalid 'id' query parameter".into()))?;

        if requested != token_user {
            warn!(token_user = %token_user, requested = %requested, "id does not match token subject");
            return Err(ApiError::Forbidden(
                "unauthorized: can only access your own resources".into(),
            ));
        }

        Ok(AuthorizedUser(token_user))
    }
}

fn authenticate(parts: &Parts, keys: &JwtKeys) -> Result<String, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("invalid authorization format".into()))?;

    keys.validate(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        ApiError::Unauthorized("invalid or expired token".into())
    })
}

/// JSON request body, decoded whatever the declared content type.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::BadRequest("invalid request format".into());
        let body = Bytes::from_request(req, state).await.map_err(|_| invalid())?;
        let value = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "undecodable request body");
            invalid()
        })?;
        Ok(JsonBody(value))
    }
}
