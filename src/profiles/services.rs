use tracing::debug;

use crate::profiles::dto::{UpdatePreferencesRequest, UpdateProfileRequest};
use crate::profiles::repo_types::{DisplayMode, Profile};
use crate::storage::KvStore;

/// A profile that is guaranteed to exist in memory; `created` is set when
/// nothing was stored and the default was synthesized.
#[derive(Debug)]
pub struct LoadedProfile {
    pub profile: Profile,
    pub created: bool,
}

pub async fn load_or_default(store: &dyn KvStore, user_id: &str) -> anyhow::Result<LoadedProfile> {
    match Profile::find(store, user_id).await? {
        Some(profile) => Ok(LoadedProfile {
            profile,
            created: false,
        }),
        None => {
            debug!(user_id = %user_id, "no stored profile, using defaults");
            Ok(LoadedProfile {
                profile: Profile::new_default(user_id),
                created: true,
            })
        }
    }
}

/// Overwrites only the fields the request actually carries.
pub fn apply_profile_update(profile: &mut Profile, req: &UpdateProfileRequest) {
    if let Some(name) = req.name() {
        profile.name = name.trim().to_string();
    }
    if let Some(email) = req.email() {
        profile.email = email.trim().to_string();
    }
    if let Some(phone) = req.phone() {
        profile.phone = phone.trim().to_string();
    }
    if let Some(address) = req.address() {
        profile.address = address.trim().to_string();
    }
}

pub fn apply_preferences_update(
    profile: &mut Profile,
    req: &UpdatePreferencesRequest,
    display_mode: Option<DisplayMode>,
) {
    let prefs = &mut profile.preferences;
    if let Some(language) = req.language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        prefs.language = language.to_string();
    }
    if req.notifications.is_some() {
        prefs.notifications = req.notifications;
    }
    if display_mode.is_some() {
        prefs.display_mode = display_mode;
    }
}
