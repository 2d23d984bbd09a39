use serde::{Deserialize, Serialize};

/// Blank strings count as "not provided" throughout.
fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateProfileRequest {
    pub fn name(&self) -> Option<&str> {
        provided(&self.name)
    }
    pub fn email(&self) -> Option<&str> {
        provided(&self.email)
    }
    pub fn phone(&self) -> Option<&str> {
        provided(&self.phone)
    }
    pub fn address(&self) -> Option<&str> {
        provided(&self.address)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub language: Option<String>,
    pub notifications: Option<bool>,
    pub display_mode: Option<String>,
}

impl UpdatePreferencesRequest {
    pub fn display_mode(&self) -> Option<&str> {
        provided(&self.display_mode)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Optional `action` selector on the shared write endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
}
