use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create/update request body. Fields default to empty so a missing field
/// reaches validation and comes back as a 400 with a message instead of an
/// extractor rejection.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserPayload {
    /// Trims both fields, lowercases the email, and checks the field
    /// constraints. Runs before any storage call.
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        if self.name.is_empty() {
            return Err(ApiError::Validation("name is required".into()));
        }
        if self.name.chars().count() > 100 {
            return Err(ApiError::Validation("name is too long (max 100)".into()));
        }
        if self.email.is_empty() {
            return Err(ApiError::Validation("email is required".into()));
        }
        if self.email.chars().count() > 255 {
            return Err(ApiError::Validation("email is too long (max 255)".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation("email is not valid".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str) -> UserPayload {
        UserPayload {
            name: name.into(),
            email: email.into(),
        }
    }

    #[test]
    fn accepts_and_normalizes_valid_payload() {
        let p = payload("  Ada Lovelace ", " Ada@Example.COM ").validate().unwrap();
        assert_eq!(p.name, "Ada Lovelace");
        assert_eq!(p.email, "ada@example.com");
    }

    #[test]
    fn rejects_missing_name() {
        let err = payload("   ", "a@b.co").validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn rejects_missing_email() {
        let err = payload("Ada", "").validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["no-at-sign", "two@@signs.com", "no@tld", "spaces in@mail.com"] {
            assert!(payload("Ada", bad).validate().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn rejects_overlong_fields() {
        assert!(payload(&"x".repeat(101), "a@b.co").validate().is_err());
        let long_email = format!("{}@example.com", "x".repeat(250));
        assert!(payload("Ada", &long_email).validate().is_err());
    }

    #[test]
    fn email_regex_accepts_common_forms() {
        for good in ["a@b.co", "first.last@sub.domain.org", "x+tag@example.io"] {
            assert!(is_valid_email(good), "rejected {good}");
        }
    }
}
