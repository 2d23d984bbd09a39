use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    accounts,
    auth::{password::hash_password, AuthorizedUser, JsonBody},
    error::ApiError,
    profiles::{
        dto::{
            ActionQuery, ChangePasswordRequest, MessageResponse, UpdatePreferencesRequest,
            UpdateProfileRequest,
        },
        repo_types::Profile,
        services::{apply_preferences_update, apply_profile_update, load_or_default},
        validation::{validate_change_password, validate_update_preferences, validate_update_profile},
    },
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(get_profile).put(update_user).post(update_user),
        )
        .route(
            "/api/users/password",
            post(change_password).put(change_password),
        )
        .route(
            "/api/users/preferences",
            post(update_preferences).put(update_preferences),
        )
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthorizedUser(user_id): AuthorizedUser,
) -> Result<Json<Profile>, ApiError> {
    let loaded = load_or_default(state.profiles.as_ref(), &user_id)
        .await
        .map_err(|e| ApiError::internal("failed to load profile", e))?;

    if loaded.created {
        loaded
            .profile
            .save(state.profiles.as_ref())
            .await
            .map_err(|e| ApiError::internal("failed to create default profile", e))?;
        info!(user_id = %user_id, "default profile created");
    }

    Ok(Json(loaded.profile))
}

#[instrument(skip(state, req))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthorizedUser(user_id): AuthorizedUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    validate_update_profile(&req)?;

    let mut profile = load_or_default(state.profiles.as_ref(), &user_id)
        .await
        .map_err(|e| ApiError::internal("failed to load profile", e))?
        .profile;
    apply_profile_update(&mut profile, &req);

    profile
        .save(state.profiles.as_ref())
        .await
        .map_err(|e| ApiError::internal("failed to update profile", e))?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(profile))
}

/// Writes the new hash to the auth records; the profile record is not touched.
#[instrument(skip(state, req))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthorizedUser(user_id): AuthorizedUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let password = validate_change_password(&req, state.config.password.min_length)?;

    let cost = state.config.password.bcrypt_cost;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| ApiError::internal("failed to hash password", e))?
        .map_err(|e| ApiError::internal("failed to hash password", e))?;

    accounts::update_password(state.accounts.as_ref(), &user_id, &hash)
        .await
        .map_err(|e| ApiError::internal("failed to update password", e))?;

    info!(user_id = %user_id, "password changed");
    Ok(Json(MessageResponse {
        message: "password changed successfully",
    }))
}

#[instrument(skip(state, req))]
pub async fn update_preferences(
    State(state): State<AppState>,
    AuthorizedUser(user_id): AuthorizedUser,
    JsonBody(req): JsonBody<UpdatePreferencesRequest>,
) -> Result<Json<Profile>, ApiError> {
    let display_mode = validate_update_preferences(&req)?;

    let mut profile = load_or_default(state.profiles.as_ref(), &user_id)
        .await
        .map_err(|e| ApiError::internal("failed to load profile", e))?
        .profile;
    apply_preferences_update(&mut profile, &req, display_mode);

    profile
        .save(state.profiles.as_ref())
        .await
        .map_err(|e| ApiError::internal("failed to update preferences", e))?;

    info!(user_id = %user_id, "preferences updated");
    Ok(Json(profile))
}

/// PUT/POST /api/users, routed by the optional `action` query parameter.
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthorizedUser,
    action: Option<Query<ActionQuery>>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    let action = action
        .and_then(|Query(q)| q.action)
        .map(|a| a.trim().to_lowercase())
        .unwrap_or_default();

    match action.as_str() {
        "" | "profile" => update_profile(State(state), user, decode(body)?)
            .await
            .map(IntoResponse::into_response),
        "password" => change_password(State(state), user, decode(body)?)
            .await
            .map(IntoResponse::into_response),
        "preferences" => update_preferences(State(state), user, decode(body)?)
            .await
            .map(IntoResponse::into_response),
        other => Err(ApiError::BadRequest(format!("unknown action '{}'", other))),
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<JsonBody<T>, ApiError> {
    serde_json::from_value(body)
        .map(JsonBody)
        .map_err(|_| ApiError::BadRequest("invalid request format".into()))
}
