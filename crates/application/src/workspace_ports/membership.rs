use std::collections::BTreeSet;

use async_trait::async_trait;
use insightdeck_core::{AppResult, EntityId, UserId};
use insightdeck_domain::{EntityMembership, ResourceAnchor, ResourceRef, UserAccount};

/// Read port over the user/entity membership graph.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Finds a user account by id.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists the ids of every entity in the system.
    async fn list_all_entity_ids(&self) -> AppResult<BTreeSet<EntityId>>;

    /// Lists entity ids reachable from any of the given users.
    async fn list_entity_ids_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<BTreeSet<EntityId>>;

    /// Lists the membership edges of one user.
    async fn list_memberships_for_user(&self, user_id: UserId)
    -> AppResult<Vec<EntityMembership>>;

    /// Lists every active user, ordered by id.
    async fn list_active_users(&self) -> AppResult<Vec<UserAccount>>;

    /// Lists distinct active non-SUPERADMIN users with a membership in any of
    /// the given entities, ordered by id.
    async fn list_active_users_sharing_entities(
        &self,
        entity_ids: &BTreeSet<EntityId>,
    ) -> AppResult<Vec<UserAccount>>;
}

/// Port that walks a resource up its ownership chain.
#[async_trait]
pub trait ResourceAnchorRepository: Send + Sync {
    /// Resolves the anchor of a resource, `None` when the resource does not exist.
    async fn resolve_anchor(&self, resource: ResourceRef) -> AppResult<Option<ResourceAnchor>>;
}
