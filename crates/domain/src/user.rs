//! User account types and validation rules.

use chrono::{DateTime, Utc};
use insightdeck_core::{AppError, AppResult, NonEmptyString, Principal, Role, UserId};
use serde::{Deserialize, Serialize};

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if normalized.len() > 64 {
            return Err(AppError::Validation(
                "email address must not exceed 64 characters".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Closed role.
    pub role: Role,
    /// Inactive accounts are denied every scoped operation.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Returns the access-control view of this account.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role, self.active)
    }
}

/// Validated input for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: NonEmptyString,
    email: EmailAddress,
    role: Role,
}

impl UserDraft {
    /// Creates a validated user draft. The role text is parsed case-insensitively.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: &str) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name.into().trim())?,
            email: EmailAddress::new(email)?,
            role: role.parse()?,
        })
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the normalized email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the requested role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}
