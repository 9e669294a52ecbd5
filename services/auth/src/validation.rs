//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::RegisterRequest;

/// Characters accepted as the "special character" of a password
const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate a registration request, returning the first failure
pub fn validate_registration(request: &RegisterRequest) -> Result<(), String> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err("Username, email, and password are required".to_string());
    }

    validate_email(&request.email)?;
    validate_password(&request.password)
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password: at least 8 characters, one digit and one symbol
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least 1 number".to_string());
    }

    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err("Password must contain at least 1 special character".to_string());
    }

    Ok(())
}
