use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, Principal};
use insightdeck_domain::{
    OwnershipStrategy, PageRequest, ParentTarget, ResourceParent, ScopedResource, TenantSelection,
};
use tracing::info;

use crate::access_service::insufficient_permissions;
use crate::{AccessService, ResourceListQuery, ResourceStore, RowScope};

/// Read and delete operations shared by every scoped resource kind.
///
/// Existence is always checked before accessibility.
pub struct ResourceService<R: ScopedResource> {
    access: AccessService,
    store: Arc<dyn ResourceStore<R>>,
}

impl<R: ScopedResource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            access: self.access.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: ScopedResource> ResourceService<R> {
    /// Creates a new resource service for one kind.
    #[must_use]
    pub fn new(access: AccessService, store: Arc<dyn ResourceStore<R>>) -> Self {
        Self { access, store }
    }

    /// Loads one record the principal may see.
    pub async fn get(
        &self,
        principal: &Principal,
        id: i64,
        selection: Option<TenantSelection>,
    ) -> AppResult<R> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {id} does not exist", R::KIND)))?;

        if !self
            .access
            .is_resource_accessible(principal, record.resource_ref(), selection)
            .await?
        {
            return Err(insufficient_permissions());
        }

        Ok(record)
    }

    /// Lists one page of visible records.
    pub async fn list_page(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        page: PageRequest,
    ) -> AppResult<Vec<R>> {
        self.access
            .list_accessible(self.store.as_ref(), principal, selection, None, Some(page))
            .await
    }

    /// Lists every visible record.
    pub async fn list_all(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
    ) -> AppResult<Vec<R>> {
        self.access
            .list_accessible(self.store.as_ref(), principal, selection, None, None)
            .await
    }

    /// Counts visible records.
    pub async fn count(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
    ) -> AppResult<i64> {
        self.access
            .count_accessible(self.store.as_ref(), principal, selection, None)
            .await
    }

    /// Lists the records under a parent the principal may see.
    ///
    /// Once the parent is cleared its children are listed by parent alone,
    /// so an owner with no entity still sees their own dashboards.
    pub async fn list_children(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        parent: ResourceParent,
        page: Option<PageRequest>,
    ) -> AppResult<Vec<R>> {
        self.require_parent(principal, selection, parent).await?;
        self.store.list(&children_query(parent, page)).await
    }

    /// Counts the records under a parent the principal may see.
    pub async fn count_children(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        parent: ResourceParent,
    ) -> AppResult<i64> {
        self.require_parent(principal, selection, parent).await?;
        self.store.count(&children_query(parent, None)).await
    }

    /// Deletes one record the principal may see, together with its dependents.
    ///
    /// Context-family records additionally require an ADMIN or SUPERADMIN.
    pub async fn delete(
        &self,
        principal: &Principal,
        id: i64,
        selection: Option<TenantSelection>,
    ) -> AppResult<()> {
        self.get(principal, id, selection).await?;

        if R::KIND.ownership() == OwnershipStrategy::OwnedByContextMembership
            && !principal.role().is_admin_or_above()
        {
            return Err(insufficient_permissions());
        }

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("{} {id} does not exist", R::KIND)));
        }

        info!(user_id = %principal.user_id(), kind = %R::KIND, id, "deleted resource");
        Ok(())
    }

    async fn require_parent(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        parent: ResourceParent,
    ) -> AppResult<()> {
        if !R::KIND.supports_parent(&parent) {
            return Err(AppError::Validation(format!(
                "{} cannot be listed by {parent:?}",
                R::KIND
            )));
        }

        match parent.target() {
            ParentTarget::Resource(resource) => {
                self.access
                    .require_resource(principal, resource, selection)
                    .await
            }
            ParentTarget::User(user_id) => self
                .access
                .require_visible_user(principal, user_id)
                .await
                .map(|_| ()),
        }
    }
}

fn children_query(parent: ResourceParent, page: Option<PageRequest>) -> ResourceListQuery {
    ResourceListQuery {
        scope: RowScope::ParentOnly,
        parent: Some(parent),
        page,
    }
}
