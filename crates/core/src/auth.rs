use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, UserId};

/// Closed set of roles a user account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Global administrator, bypasses entity scoping.
    SuperAdmin,
    /// Administrator of the entities they are a member of.
    Admin,
    /// Regular user, scoped to their own resources.
    User,
}

impl Role {
    /// Returns the stable uppercase storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPERADMIN",
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    /// Returns whether this role may manage other users and catalog resources.
    #[must_use]
    pub fn is_admin_or_above(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SUPERADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Authenticated caller as seen by every access decision.
///
/// A principal is rebuilt from storage on each request, so role and activity
/// changes apply from the next request onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    role: Role,
    active: bool,
}

impl Principal {
    /// Creates a principal from persisted account state.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, active: bool) -> Self {
        Self {
            user_id,
            role,
            active,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the account role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether the principal holds the global administrator role.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Principal, Role};
    use crate::UserId;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::from_str("superadmin").ok(), Some(Role::SuperAdmin));
        assert_eq!(Role::from_str(" Admin ").ok(), Some(Role::Admin));
        assert_eq!(Role::from_str("USER").ok(), Some(Role::User));
    }

    #[test]
    fn role_parsing_rejects_unknown_values() {
        assert!(Role::from_str("owner").is_err());
    }

    #[test]
    fn role_storage_value_is_uppercase() {
        for role in [Role::SuperAdmin, Role::Admin, Role::User] {
            assert_eq!(role.as_str(), role.as_str().to_ascii_uppercase());
            assert_eq!(Role::from_str(role.as_str()).ok(), Some(role));
        }
    }

    #[test]
    fn principal_reports_super_admin_role() {
        let principal = Principal::new(UserId::from_i64(1), Role::SuperAdmin, true);
        assert!(principal.is_super_admin());
        assert!(!Principal::new(UserId::from_i64(2), Role::Admin, true).is_super_admin());
    }
}
