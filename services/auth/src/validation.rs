//! Input validation for account forms

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{LoginCredentials, ProfileUpdate, Registration};

/// Minimum password length accepted by the registration form
pub const MIN_PASSWORD_LEN: usize = 6;

/// Client-side validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields ({0} is missing)")]
    Required(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require(email, "email")?;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("Failed to compile email regex"));

    if !regex.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    require(password, "password")?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }

    Ok(())
}

/// Validate the registration form: every field, then email, then password
pub fn validate_registration(form: &Registration) -> Result<(), ValidationError> {
    require(&form.name, "name")?;
    require(&form.email, "email")?;
    require(&form.password, "password")?;
    validate_email(&form.email)?;
    validate_password(&form.password)
}

/// Validate the login form
pub fn validate_credentials(credentials: &LoginCredentials) -> Result<(), ValidationError> {
    require(&credentials.email, "email")?;
    require(&credentials.password, "password")
}

/// Validate the profile form; the password is only checked when changing it
pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationError> {
    require(&update.name, "name")?;
    validate_email(&update.email)?;
    if let Some(password) = &update.password {
        validate_password(password)?;
    }
    Ok(())
}
