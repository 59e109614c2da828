//! Validation helpers and constants for API handlers

use regex::Regex;
use validator::ValidationError;

use crate::domain::entities::{AGE_GROUPS, SPORTS};

lazy_static::lazy_static! {
    /// Team code: exactly six uppercase letters or digits
    pub static ref TEAM_CODE_REGEX: Regex = Regex::new(r"^[A-Z0-9]{6}$").unwrap();

    /// Phone number: digits plus the usual separators, at least 7 digits checked separately
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-.]{7,30}$").unwrap();
}

pub fn validate_sport(sport: &str) -> std::result::Result<(), ValidationError> {
    if SPORTS.contains(&sport) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_sport"))
    }
}

pub fn validate_age_group(age_group: &str) -> std::result::Result<(), ValidationError> {
    if AGE_GROUPS.contains(&age_group) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_age_group"))
    }
}

/// Rejects values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

pub fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    let phone = phone.trim();
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if PHONE_REGEX.is_match(phone) && digits >= 7 {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_phone"))
    }
}
