//! Login and registration form validation
//!
//! Runs before any store interaction. Check order is: empty fields, email
//! format, password length, confirmation match.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// local-part@domain with a dot in the domain. Format only, no deliverability.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Why a submitted form was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationReason {
    EmptyFields,
    InvalidEmail,
    PasswordTooShort { min: usize },
    PasswordMismatch,
}

impl ValidationReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationReason::EmptyFields => "empty_fields",
            ValidationReason::InvalidEmail => "invalid_email",
            ValidationReason::PasswordTooShort { .. } => "password_too_short",
            ValidationReason::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::EmptyFields => write!(f, "Please fill in all fields"),
            ValidationReason::InvalidEmail => write!(f, "Please enter a valid email address"),
            ValidationReason::PasswordTooShort { min } => {
                write!(f, "Password must be at least {} characters", min)
            }
            ValidationReason::PasswordMismatch => write!(f, "Passwords do not match"),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Validate a login form. Returns the trimmed email on success.
pub fn validate_login<'a>(email: &'a str, password: &str) -> Result<&'a str, ValidationReason> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(ValidationReason::EmptyFields);
    }
    if !is_valid_email(email) {
        return Err(ValidationReason::InvalidEmail);
    }
    Ok(email)
}

/// Validate a registration form. Returns the trimmed email on success.
pub fn validate_registration<'a>(
    email: &'a str,
    password: &str,
    confirm: &str,
    min_password_length: usize,
) -> Result<&'a str, ValidationReason> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() || confirm.trim().is_empty() {
        return Err(ValidationReason::EmptyFields);
    }
    if !is_valid_email(email) {
        return Err(ValidationReason::InvalidEmail);
    }
    if password.chars().count() < min_password_length {
        return Err(ValidationReason::PasswordTooShort {
            min: min_password_length,
        });
    }
    if password != confirm {
        return Err(ValidationReason::PasswordMismatch);
    }
    Ok(email)
}
