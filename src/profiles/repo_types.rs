use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_ROLE: &str = "buyer";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    Dark,
}

impl DisplayMode {
    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            notifications: Some(true),
            display_mode: Some(DisplayMode::Light),
        }
    }
}

/// Profile record stored under `/users/profiles/<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Profile {
    /// Fresh profile for a user seen for the first time.
    pub fn new_default(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            preferences: Preferences::default(),
            roles: vec![DEFAULT_ROLE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_profile_values() {
        let p = Profile::new_default("user123");
        assert_eq!(p.id, "user123");
        assert_eq!(p.preferences.language, "en");
        assert_eq!(p.preferences.notifications, Some(true));
        assert_eq!(p.preferences.display_mode, Some(DisplayMode::Light));
        assert_eq!(p.roles, vec!["buyer".to_string()]);
    }

    #[test]
    fn profile_json_shape() {
        let mut p = Profile::new_default("user123");
        p.name = "John Doe".into();
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "user123",
                "name": "John Doe",
                "email": "",
                "phone": "",
                "preferences": { "language": "en", "notifications": true, "displayMode": "light" },
                "roles": ["buyer"]
            })
        );
    }

    #[test]
    fn address_is_serialized_when_set() {
        let mut p = Profile::new_default("u");
        p.address = "123 Main St".into();
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["address"], "123 Main St");
    }

    #[test]
    fn sparse_stored_record_decodes() {
        let p: Profile = serde_json::from_value(json!({
            "id": "u1",
            "name": "Jane",
            "preferences": { "notifications": false },
            "roles": ["buyer", "seller"]
        }))
        .unwrap();
        assert_eq!(p.email, "");
        assert_eq!(p.preferences.notifications, Some(false));
        assert_eq!(p.preferences.display_mode, None);
        assert_eq!(p.preferences.language, "");
        assert_eq!(p.roles.len(), 2);
    }

    #[test]
    fn display_mode_parse_is_case_insensitive() {
        assert_eq!(DisplayMode::parse("light"), Some(DisplayMode::Light));
        assert_eq!(DisplayMode::parse("dark"), Some(DisplayMode::Dark));
        assert_eq!(DisplayMode::parse("LIGHT"), Some(DisplayMode::Light));
        assert_eq!(DisplayMode::parse("Dark"), Some(DisplayMode::Dark));
        assert_eq!(DisplayMode::parse(" dark "), Some(DisplayMode::Dark));
        assert_eq!(DisplayMode::parse("blue"), None);
        assert_eq!(DisplayMode::parse(""), None);
    }
}
