use std::collections::BTreeSet;
use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, EntityId, Principal, Role, UserId};
use insightdeck_domain::{
    OwnershipStrategy, PageRequest, ResourceAnchor, ResourceKind, ResourceParent, ResourceRef,
    ScopedResource, TenantSelection, UserAccount,
};
use tracing::{debug, warn};

use crate::{
    MembershipRepository, ResourceAnchorRepository, ResourceListQuery, ResourceStore, RowScope,
};

/// Resolves which entities, users and resources a principal may act on.
///
/// Every call recomputes from current membership state. Denial is reported
/// through return values; `Err` only carries storage failures, except for the
/// `require_*` helpers which translate denial into `NotFound`/`Forbidden`.
#[derive(Clone)]
pub struct AccessService {
    memberships: Arc<dyn MembershipRepository>,
    anchors: Arc<dyn ResourceAnchorRepository>,
}

impl AccessService {
    /// Creates a new access service from repository implementations.
    #[must_use]
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        anchors: Arc<dyn ResourceAnchorRepository>,
    ) -> Self {
        Self {
            memberships,
            anchors,
        }
    }

    async fn own_entity_ids(&self, user_id: UserId) -> AppResult<BTreeSet<EntityId>> {
        self.memberships.list_entity_ids_for_users(&[user_id]).await
    }
}

/// Error returned when a principal is outside a resource's scope.
///
/// The message never names the scope that failed.
pub(crate) fn insufficient_permissions() -> AppError {
    AppError::Forbidden("insufficient permissions".to_owned())
}

mod entities;
mod resources;
mod rows;
mod users;
