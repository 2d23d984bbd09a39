use lazy_static::lazy_static;
use regex::Regex;

use super::dto::{ChangePasswordRequest, UpdatePreferencesRequest, UpdateProfileRequest};
use super::repo_types::DisplayMode;

/// bcrypt only reads this many bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name cannot be empty or whitespace only")]
    BlankName,
    #[error("email cannot be empty or whitespace only")]
    BlankEmail,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("new password cannot be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("password must be at most {max} bytes long")]
    PasswordTooLong { max: usize },
    #[error("displayMode must be 'light' or 'dark'")]
    InvalidDisplayMode,
}

/// One `@`, a non-empty local part, and a domain containing a dot.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@]+@[^@]*\.[^@]*$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_update_profile(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    if let Some(name) = req.name() {
        if name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
    }
    if let Some(email) = req.email() {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::BlankEmail);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
    }
    Ok(())
}

/// Returns the trimmed password that should be hashed.
pub fn validate_change_password(
    req: &ChangePasswordRequest,
    min_length: usize,
) -> Result<String, ValidationError> {
    let password = req.new_password.trim();
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if password.chars().count() < min_length {
        return Err(ValidationError::PasswordTooShort { min: min_length });
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::PasswordTooLong {
            max: MAX_PASSWORD_BYTES,
        });
    }
    Ok(password.to_string())
}

/// Returns the normalized display mode, if one was supplied.
pub fn validate_update_preferences(
    req: &UpdatePreferencesRequest,
) -> Result<Option<DisplayMode>, ValidationError> {
    req.display_mode()
        .map(|raw| DisplayMode::parse(raw).ok_or(ValidationError::InvalidDisplayMode))
        .transpose()
}
