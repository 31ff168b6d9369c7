use chrono::{DateTime, Utc};
use insightdeck_core::{AppResult, EntityId, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

/// Tenant organization that partitions users and catalog resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier.
    pub id: EntityId,
    /// Unique display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or updating an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDraft {
    name: NonEmptyString,
    description: Option<String>,
}

impl EntityDraft {
    /// Creates a validated entity draft.
    pub fn new(name: impl Into<String>, description: Option<String>) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name.into().trim())?,
            description: description
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        })
    }

    /// Returns the entity name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Membership edge between an entity and a user.
///
/// Edges form a set: one user appears at most once per entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMembership {
    /// Edge identifier, increasing in insertion order.
    pub membership_id: i64,
    /// Entity side of the edge.
    pub entity_id: EntityId,
    /// User side of the edge.
    pub user_id: UserId,
    /// When the user joined the entity.
    pub created_at: DateTime<Utc>,
}

/// Returns the membership that designates a user's primary entity.
///
/// The primary entity is the one joined first. Memberships created at the
/// same instant are ordered by edge identifier so the choice is stable.
#[must_use]
pub fn primary_membership(memberships: &[EntityMembership]) -> Option<&EntityMembership> {
    memberships
        .iter()
        .min_by_key(|membership| (membership.created_at, membership.membership_id))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use insightdeck_core::{EntityId, UserId};
    use proptest::prelude::*;

    use super::{EntityDraft, EntityMembership, primary_membership};

    fn membership(membership_id: i64, entity_id: i64, seconds: i64) -> EntityMembership {
        EntityMembership {
            membership_id,
            entity_id: EntityId::from_i64(entity_id),
            user_id: UserId::from_i64(1),
            created_at: Utc
                .timestamp_opt(seconds, 0)
                .single()
                .unwrap_or_else(|| unreachable!()),
        }
    }

    #[test]
    fn primary_membership_is_earliest_joined() {
        let memberships = vec![
            membership(1, 10, 300),
            membership(2, 20, 100),
            membership(3, 30, 200),
        ];
        let primary = primary_membership(&memberships).map(|value| value.entity_id);
        assert_eq!(primary, Some(EntityId::from_i64(20)));
    }

    #[test]
    fn primary_membership_ties_break_on_edge_id() {
        let memberships = vec![membership(9, 10, 100), membership(4, 20, 100)];
        let primary = primary_membership(&memberships).map(|value| value.entity_id);
        assert_eq!(primary, Some(EntityId::from_i64(20)));
    }

    #[test]
    fn primary_membership_is_none_without_memberships() {
        assert!(primary_membership(&[]).is_none());
    }

    #[test]
    fn entity_draft_trims_and_drops_blank_description() {
        let draft = EntityDraft::new("  Acme ", Some("   ".to_owned()));
        assert!(draft.is_ok());
        let draft = draft.unwrap_or_else(|_| unreachable!());
        assert_eq!(draft.name(), "Acme");
        assert_eq!(draft.description(), None);
        assert!(EntityDraft::new(" ", None).is_err());
    }

    proptest! {
        #[test]
        fn primary_membership_does_not_depend_on_order(
            mut entries in proptest::collection::vec((0_i64..1_000, 0_i64..50), 1..20)
        ) {
            entries.sort();
            entries.dedup_by_key(|entry| entry.0);
            let forward: Vec<EntityMembership> = entries
                .iter()
                .map(|(id, seconds)| membership(*id, *id, *seconds))
                .collect();
            let mut reversed = forward.clone();
            reversed.reverse();

            prop_assert_eq!(
                primary_membership(&forward).map(|value| value.entity_id),
                primary_membership(&reversed).map(|value| value.entity_id)
            );
        }
    }
}
