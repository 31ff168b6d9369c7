use std::collections::BTreeSet;

use async_trait::async_trait;
use insightdeck_core::{AppResult, EntityId, UserId};
use insightdeck_domain::{PageRequest, ResourceParent, ScopedResource};

/// Row-level filter applied by resource stores before pagination.
///
/// Entity sets carried here are never empty; callers short-circuit empty
/// scopes instead of querying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowScope {
    /// Rows whose ownership chain reaches any of the entities.
    Entities(BTreeSet<EntityId>),
    /// Rows owned by one user whose memberships reach any of the entities.
    ///
    /// Context-family stores treat this like [`RowScope::Entities`].
    OwnedWithin {
        /// Owning user.
        owner: UserId,
        /// Entity filter.
        entities: BTreeSet<EntityId>,
    },
    /// Every row under the query's parent.
    ///
    /// Only used once the caller has been cleared for the parent itself.
    /// Without a parent nothing matches.
    ParentOnly,
}

/// Query inputs for scoped resource listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListQuery {
    /// Row-level access filter.
    pub scope: RowScope,
    /// Optional parent narrowing.
    pub parent: Option<ResourceParent>,
    /// Optional pagination, applied after filtering.
    pub page: Option<PageRequest>,
}

/// Generic persistence port for one scoped resource kind.
#[async_trait]
pub trait ResourceStore<R: ScopedResource>: Send + Sync {
    /// Finds a record by id.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<R>>;

    /// Lists records matching the query, ordered by id.
    async fn list(&self, query: &ResourceListQuery) -> AppResult<Vec<R>>;

    /// Counts records matching the query, ignoring pagination.
    async fn count(&self, query: &ResourceListQuery) -> AppResult<i64>;

    /// Inserts a new record.
    async fn insert(&self, draft: R::Draft) -> AppResult<R>;

    /// Replaces the mutable fields of a record, `None` when missing.
    async fn update(&self, id: i64, draft: R::Draft) -> AppResult<Option<R>>;

    /// Deletes a record and its dependents, returns whether it existed.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}
