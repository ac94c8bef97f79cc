use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Phone number must be between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits")]
    PhoneLength { digits: usize },

    #[error("Invalid email address")]
    InvalidEmail,
}

fn non_digit() -> &'static Regex {
    static NON_DIGIT: OnceLock<Regex> = OnceLock::new();
    NON_DIGIT.get_or_init(|| Regex::new(r"\D").expect("static pattern compiles"))
}

/// Strips every non-digit and checks the remaining length.
pub fn normalize_phone(raw: &str) -> Result<String, ContactError> {
    let digits = non_digit().replace_all(raw, "").into_owned();
    if digits.len() < MIN_PHONE_DIGITS || digits.len() > MAX_PHONE_DIGITS {
        return Err(ContactError::PhoneLength { digits: digits.len() });
    }
    Ok(digits)
}

pub fn validate_email(raw: &str) -> Result<String, ContactError> {
    let trimmed = raw.trim();
    if !trimmed.contains('@') {
        return Err(ContactError::InvalidEmail);
    }
    Ok(trimmed.to_string())
}

/// Rejects empty or whitespace-only values.
pub fn require_non_blank(field: &str, raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(trimmed.to_string())
}
