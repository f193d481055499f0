//! Account use-cases: registration, login and self-service profile edits.

use std::sync::Arc;

use uuid::Uuid;

use crate::access::{Operation, authorize};
use crate::domain::{
    NewUser, ProfileChanges, User, normalize_email, validate_email, validate_name,
};
use crate::error::{DomainError, FieldErrors, NON_FIELD_ERRORS};
use crate::filter::ProfileFilter;
use crate::ports::{PasswordService, UserRepository};

const MIN_PASSWORD_LEN: usize = 5;

/// User account service.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create, save and return a new user.
    pub async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let email = normalize_email(&input.email);

        let mut errors = FieldErrors::default();
        validate_email(&email, &mut errors);
        validate_name(&input.name, &mut errors);
        validate_password(&input.password, &mut errors);
        errors.into_result()?;

        self.ensure_email_free(&email, None).await?;

        let password_hash = self.hash(&input.password)?;
        let user = User::new(email, input.name.trim().to_string(), password_hash);
        let saved = self.users.insert(user).await?;

        tracing::info!(user_id = %saved.id, "User created");
        Ok(saved)
    }

    /// Create a user and grant staff and superuser flags.
    pub async fn create_superuser(&self, input: NewUser) -> Result<User, DomainError> {
        let mut user = self.create_user(input).await?;
        user.elevate();
        let saved = self.users.update(user).await?;

        tracing::info!(user_id = %saved.id, "Superuser created");
        Ok(saved)
    }

    /// Check credentials and return the matching active user.
    ///
    /// Unknown email, wrong password and inactive accounts all fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        let rejected =
            || DomainError::invalid(NON_FIELD_ERRORS, "Unable to log in with provided credentials.");

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(rejected());
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid || !user.is_active {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(rejected());
        }

        Ok(user)
    }

    /// Profiles matching `filter`. Profiles are public.
    pub async fn list(&self, filter: &ProfileFilter) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list(filter).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "user",
                id,
            })
    }

    /// Look up the user behind an authenticated request.
    ///
    /// Missing or inactive users are treated as unauthenticated.
    pub async fn active_user(&self, id: Uuid) -> Result<User, DomainError> {
        match self.users.find_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(DomainError::Unauthorized),
        }
    }

    /// Apply profile changes. Only the profile's owner may do this.
    ///
    /// With `partial == false` every required field must be present.
    pub async fn update(
        &self,
        requester: Uuid,
        id: Uuid,
        changes: ProfileChanges,
        partial: bool,
    ) -> Result<User, DomainError> {
        let mut user = self.get(id).await?;
        authorize(requester, &user, Operation::Write)?;

        if !partial {
            changes.require_complete()?;
        }

        let email = changes.email.as_deref().map(normalize_email);

        let mut errors = FieldErrors::default();
        if let Some(email) = &email {
            validate_email(email, &mut errors);
        }
        if let Some(name) = &changes.name {
            validate_name(name, &mut errors);
        }
        if let Some(password) = &changes.password {
            validate_password(password, &mut errors);
        }
        errors.into_result()?;

        if let Some(email) = email {
            if email != user.email {
                self.ensure_email_free(&email, Some(user.id)).await?;
            }
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name.trim().to_string();
        }
        if let Some(password) = changes.password {
            user.password_hash = self.hash(&password)?;
        }
        user.touch();

        Ok(self.users.update(user).await?)
    }

    /// Delete a profile and, through the repository, everything it owns.
    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<(), DomainError> {
        let user = self.get(id).await?;
        authorize(requester, &user, Operation::Write)?;

        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> Result<(), DomainError> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(
                "user with this email already exists.".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

fn validate_password(password: &str, errors: &mut FieldErrors) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            "Ensure this field has at least 5 characters.",
        );
    }
}
