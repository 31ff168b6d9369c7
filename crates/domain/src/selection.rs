//! Tenant-selection override carried explicitly on each request.

use insightdeck_core::{AppError, AppResult, EntityId, Role};
use serde::{Deserialize, Serialize};

/// Wire value meaning "every entity".
pub const ALL_ENTITIES_WIRE_VALUE: i64 = 0;

/// Entity scope chosen by a SUPERADMIN for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "entity_id", rename_all = "snake_case")]
pub enum TenantSelection {
    /// No narrowing, every entity is in scope.
    AllEntities,
    /// Scope narrowed to a single entity.
    Entity(EntityId),
}

impl TenantSelection {
    /// Normalizes the raw request parameter for the given role.
    ///
    /// SUPERADMIN callers get `AllEntities` when the parameter is absent or
    /// zero and a single entity otherwise; negative values are rejected as
    /// malformed. Every other role ignores the parameter and gets `None`.
    pub fn from_request(role: Role, raw: Option<i64>) -> AppResult<Option<Self>> {
        if role != Role::SuperAdmin {
            return Ok(None);
        }

        if let Some(value) = raw
            && value < 0
        {
            return Err(AppError::Validation(format!(
                "entity_id must be zero or a positive identifier, got {value}"
            )));
        }

        Ok(Some(Self::from_wire(raw.unwrap_or(ALL_ENTITIES_WIRE_VALUE))))
    }

    /// Interprets a non-negative wire value.
    #[must_use]
    pub fn from_wire(value: i64) -> Self {
        if value == ALL_ENTITIES_WIRE_VALUE {
            Self::AllEntities
        } else {
            Self::Entity(EntityId::from_i64(value))
        }
    }

    /// Returns the wire value for this selection.
    #[must_use]
    pub fn as_wire(&self) -> i64 {
        match self {
            Self::AllEntities => ALL_ENTITIES_WIRE_VALUE,
            Self::Entity(entity_id) => entity_id.as_i64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use insightdeck_core::{EntityId, Role};
    use proptest::prelude::*;

    use super::TenantSelection;

    #[test]
    fn super_admin_without_parameter_selects_all_entities() {
        let selection = TenantSelection::from_request(Role::SuperAdmin, None);
        assert_eq!(selection.ok(), Some(Some(TenantSelection::AllEntities)));
    }

    #[test]
    fn super_admin_zero_selects_all_entities() {
        let selection = TenantSelection::from_request(Role::SuperAdmin, Some(0));
        assert_eq!(selection.ok(), Some(Some(TenantSelection::AllEntities)));
    }

    #[test]
    fn super_admin_positive_value_selects_one_entity() {
        let selection = TenantSelection::from_request(Role::SuperAdmin, Some(5));
        assert_eq!(
            selection.ok(),
            Some(Some(TenantSelection::Entity(EntityId::from_i64(5))))
        );
    }

    #[test]
    fn negative_values_are_rejected_for_super_admins_only() {
        assert!(TenantSelection::from_request(Role::SuperAdmin, Some(-1)).is_err());
        assert_eq!(
            TenantSelection::from_request(Role::User, Some(-3)).ok(),
            Some(None)
        );
        assert_eq!(
            TenantSelection::from_request(Role::Admin, Some(-3)).ok(),
            Some(None)
        );
    }

    proptest! {
        #[test]
        fn non_super_admin_roles_never_carry_a_selection(
            raw in proptest::option::of(-10_000_i64..10_000),
            admin in any::<bool>()
        ) {
            let role = if admin { Role::Admin } else { Role::User };
            let selection = TenantSelection::from_request(role, raw);
            prop_assert_eq!(selection.ok(), Some(None));
        }

        #[test]
        fn wire_value_survives_normalization(raw in 0_i64..10_000) {
            let selection = TenantSelection::from_request(Role::SuperAdmin, Some(raw));
            prop_assert_eq!(selection.ok().flatten().map(|value| value.as_wire()), Some(raw));
        }
    }
}
