use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, FieldErrors};

const MAX_EMAIL_LEN: usize = 255;
const MAX_NAME_LEN: usize = 255;

/// User entity - an account identified by its email address.
///
/// Permission flags are plain booleans; the credential lives in
/// `password_hash` and is only ever produced by a `PasswordService`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, unprivileged user with generated ID and timestamps.
    ///
    /// `email` is expected to be normalized already.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email,
            name,
            password_hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Grant staff and superuser flags.
    pub fn elevate(&mut self) {
        self.is_staff = true;
        self.is_superuser = true;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Normalize an email address: trim it and lowercase the domain part.
///
/// The local part is left untouched since some mail servers treat it as
/// case-sensitive.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Validate a (normalized) email address into `errors`.
pub fn validate_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.add("email", "Users must have an email address.");
        return;
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        errors.add("email", "Ensure this field has no more than 255 characters.");
    }
    let well_formed = email
        .rsplit_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains(' '))
        .unwrap_or(false);
    if !well_formed {
        errors.add("email", "Enter a valid email address.");
    }
}

/// Validate a display name into `errors`.
pub fn validate_name(name: &str, errors: &mut FieldErrors) {
    if name.trim().is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.add("name", "Ensure this field has no more than 255 characters.");
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Self-service profile changes. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl ProfileChanges {
    /// Full updates must carry every required field.
    pub fn require_complete(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if self.email.is_none() {
            errors.add("email", "This field is required.");
        }
        if self.name.is_none() {
            errors.add("name", "This field is required.");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(normalize_email("Test@EXAMPLE.com"), "Test@example.com");
        assert_eq!(normalize_email("  a.b@Example.COM "), "a.b@example.com");
    }

    #[test]
    fn test_normalize_email_without_at_is_trimmed() {
        assert_eq!(normalize_email(" nobody "), "nobody");
    }

    #[test]
    fn test_validate_email_rejects_empty() {
        let mut errors = FieldErrors::default();
        validate_email("", &mut errors);
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_validate_email_rejects_missing_domain() {
        let mut errors = FieldErrors::default();
        validate_email("user@", &mut errors);
        assert!(errors.contains("email"));
    }

    #[test]
    fn test_validate_email_accepts_plain_address() {
        let mut errors = FieldErrors::default();
        validate_email("user@example.com", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_elevate_sets_both_flags() {
        let mut user = User::new("a@b.c".into(), "A".into(), "hash".into());
        assert!(!user.is_staff && !user.is_superuser);

        user.elevate();

        assert!(user.is_staff);
        assert!(user.is_superuser);
    }
}
