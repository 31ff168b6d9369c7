use async_trait::async_trait;
use insightdeck_core::{AppResult, EntityId, UserId};
use insightdeck_domain::{Entity, EntityDraft, EntityMembership, PageRequest};

/// Port for entity administration and membership mutations.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Lists entities ordered by id, optionally paged.
    async fn list_entities(&self, page: Option<PageRequest>) -> AppResult<Vec<Entity>>;

    /// Counts entities.
    async fn count_entities(&self) -> AppResult<i64>;

    /// Finds an entity by id.
    async fn find_entity(&self, entity_id: EntityId) -> AppResult<Option<Entity>>;

    /// Creates an entity. Duplicate names are a conflict.
    async fn create_entity(&self, draft: EntityDraft) -> AppResult<Entity>;

    /// Updates an entity, `None` when missing. Duplicate names are a conflict.
    async fn update_entity(
        &self,
        entity_id: EntityId,
        draft: EntityDraft,
    ) -> AppResult<Option<Entity>>;

    /// Deletes an entity together with its user and context edges.
    async fn delete_entity(&self, entity_id: EntityId) -> AppResult<bool>;

    /// Adds a user to an entity. Adding an existing edge returns it unchanged.
    async fn add_membership(
        &self,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<EntityMembership>;

    /// Removes a user from an entity, returns whether the edge existed.
    async fn remove_membership(&self, entity_id: EntityId, user_id: UserId) -> AppResult<bool>;

    /// Links a context table to an entity. Linking twice is a no-op.
    async fn link_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<()>;

    /// Unlinks a context table from an entity, returns whether the edge existed.
    async fn unlink_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<bool>;
}
