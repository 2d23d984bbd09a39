use serde::{Deserialize, Serialize};

/// JWT payload issued by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>, // subject, as written by the auth service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,     // registered subject, used when user_id is absent
    pub exp: u64,                // expires at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,        // issued at (unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,     // issuer
}

impl Claims {
    /// The user id this token speaks for, if it names one.
    pub fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.sub.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
