use super::*;

impl AccessService {
    /// Builds the row filter for listing one resource kind.
    ///
    /// Returns `None` when the principal's entity scope is empty so callers
    /// can answer without touching the store.
    pub async fn row_scope(
        &self,
        principal: &Principal,
        kind: ResourceKind,
        selection: Option<TenantSelection>,
    ) -> AppResult<Option<RowScope>> {
        let entities = self.accessible_entity_ids(principal, selection).await?;
        if entities.is_empty() {
            return Ok(None);
        }

        Ok(Some(match (principal.role(), kind.ownership()) {
            (Role::User, OwnershipStrategy::OwnedByUser) => RowScope::OwnedWithin {
                owner: principal.user_id(),
                entities,
            },
            _ => RowScope::Entities(entities),
        }))
    }

    /// Lists the records of one kind the principal may see.
    ///
    /// Pagination applies after the access filter.
    pub async fn list_accessible<R: ScopedResource>(
        &self,
        store: &dyn ResourceStore<R>,
        principal: &Principal,
        selection: Option<TenantSelection>,
        parent: Option<ResourceParent>,
        page: Option<PageRequest>,
    ) -> AppResult<Vec<R>> {
        let Some(scope) = self.row_scope(principal, R::KIND, selection).await? else {
            return Ok(Vec::new());
        };

        store
            .list(&ResourceListQuery {
                scope,
                parent,
                page,
            })
            .await
    }

    /// Counts the records of one kind the principal may see.
    pub async fn count_accessible<R: ScopedResource>(
        &self,
        store: &dyn ResourceStore<R>,
        principal: &Principal,
        selection: Option<TenantSelection>,
        parent: Option<ResourceParent>,
    ) -> AppResult<i64> {
        let Some(scope) = self.row_scope(principal, R::KIND, selection).await? else {
            return Ok(0);
        };

        store
            .count(&ResourceListQuery {
                scope,
                parent,
                page: None,
            })
            .await
    }
}
