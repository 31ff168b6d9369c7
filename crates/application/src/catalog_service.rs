use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, Principal, Role};
use insightdeck_domain::{
    ContextTable, ContextTableDraft, GeneralQuery, GeneralQueryDraft, Navigation,
    NavigationDraft, ResourceKind, ResourceRef, TenantSelection, primary_membership,
};
use tracing::info;

use crate::access_service::insufficient_permissions;
use crate::{
    AccessService, CatalogLinkRepository, EntityRepository, MembershipRepository, ResourceStore,
};

/// Write operations on the context family: context tables, navigations and
/// general queries, plus the links between them.
///
/// Only ADMIN and SUPERADMIN principals may write catalog resources.
#[derive(Clone)]
pub struct CatalogService {
    access: AccessService,
    memberships: Arc<dyn MembershipRepository>,
    entities: Arc<dyn EntityRepository>,
    contexts: Arc<dyn ResourceStore<ContextTable>>,
    navigations: Arc<dyn ResourceStore<Navigation>>,
    general_queries: Arc<dyn ResourceStore<GeneralQuery>>,
    links: Arc<dyn CatalogLinkRepository>,
}

/// Storage ports used by [`CatalogService`].
pub struct CatalogStores {
    /// Context table store.
    pub contexts: Arc<dyn ResourceStore<ContextTable>>,
    /// Navigation store.
    pub navigations: Arc<dyn ResourceStore<Navigation>>,
    /// General query store.
    pub general_queries: Arc<dyn ResourceStore<GeneralQuery>>,
    /// Link tables between catalog resources.
    pub links: Arc<dyn CatalogLinkRepository>,
}

impl CatalogService {
    /// Creates a new catalog service.
    #[must_use]
    pub fn new(
        access: AccessService,
        memberships: Arc<dyn MembershipRepository>,
        entities: Arc<dyn EntityRepository>,
        stores: CatalogStores,
    ) -> Self {
        Self {
            access,
            memberships,
            entities,
            contexts: stores.contexts,
            navigations: stores.navigations,
            general_queries: stores.general_queries,
            links: stores.links,
        }
    }

    /// Creates a context table.
    ///
    /// A context created by an ADMIN is linked to the ADMIN's primary entity;
    /// an ADMIN without any entity cannot create one.
    pub async fn create_context(
        &self,
        principal: &Principal,
        draft: ContextTableDraft,
    ) -> AppResult<ContextTable> {
        require_catalog_writer(principal)?;

        let home_entity = match principal.role() {
            Role::Admin => {
                let memberships = self
                    .memberships
                    .list_memberships_for_user(principal.user_id())
                    .await?;
                let primary = primary_membership(&memberships).ok_or_else(|| {
                    AppError::Validation("admin must be mapped to an entity".to_owned())
                })?;
                Some(primary.entity_id)
            }
            Role::SuperAdmin | Role::User => None,
        };

        let context = self.contexts.insert(draft).await?;
        if let Some(entity_id) = home_entity {
            self.entities.link_context(entity_id, context.id).await?;
        }

        info!(
            user_id = %principal.user_id(),
            context_id = context.id,
            "created context table"
        );
        Ok(context)
    }

    /// Updates a context table the principal may see.
    pub async fn update_context(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        context_id: i64,
        draft: ContextTableDraft,
    ) -> AppResult<ContextTable> {
        self.require_writable(principal, selection, ResourceKind::ContextTable, context_id)
            .await?;

        self.contexts
            .update(context_id, draft)
            .await?
            .ok_or_else(|| missing(ResourceKind::ContextTable, context_id))
    }

    /// Creates a navigation linked to a context table the principal may see.
    pub async fn create_navigation(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        context_id: i64,
        draft: NavigationDraft,
    ) -> AppResult<Navigation> {
        self.require_writable(principal, selection, ResourceKind::ContextTable, context_id)
            .await?;

        let navigation = self.navigations.insert(draft).await?;
        self.links.link_navigation(context_id, navigation.id).await?;

        info!(
            user_id = %principal.user_id(),
            navigation_id = navigation.id,
            context_id,
            "created navigation"
        );
        Ok(navigation)
    }

    /// Updates a navigation the principal may see.
    pub async fn update_navigation(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        navigation_id: i64,
        draft: NavigationDraft,
    ) -> AppResult<Navigation> {
        self.require_writable(principal, selection, ResourceKind::Navigation, navigation_id)
            .await?;

        self.navigations
            .update(navigation_id, draft)
            .await?
            .ok_or_else(|| missing(ResourceKind::Navigation, navigation_id))
    }

    /// Links an existing navigation to another context table.
    pub async fn link_navigation(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        context_id: i64,
        navigation_id: i64,
    ) -> AppResult<()> {
        self.require_writable(principal, selection, ResourceKind::ContextTable, context_id)
            .await?;
        self.require_writable(principal, selection, ResourceKind::Navigation, navigation_id)
            .await?;

        self.links.link_navigation(context_id, navigation_id).await
    }

    /// Removes a context/navigation link.
    pub async fn unlink_navigation(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        context_id: i64,
        navigation_id: i64,
    ) -> AppResult<()> {
        self.require_writable(principal, selection, ResourceKind::ContextTable, context_id)
            .await?;

        if !self.links.unlink_navigation(context_id, navigation_id).await? {
            return Err(AppError::NotFound(format!(
                "navigation {navigation_id} is not linked to context table {context_id}"
            )));
        }

        Ok(())
    }

    /// Creates a general query linked to a navigation the principal may see.
    pub async fn create_general_query(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        navigation_id: i64,
        draft: GeneralQueryDraft,
    ) -> AppResult<GeneralQuery> {
        self.require_writable(principal, selection, ResourceKind::Navigation, navigation_id)
            .await?;

        let general_query = self.general_queries.insert(draft).await?;
        self.links
            .link_general_query(navigation_id, general_query.id)
            .await?;

        info!(
            user_id = %principal.user_id(),
            general_query_id = general_query.id,
            navigation_id,
            "created general query"
        );
        Ok(general_query)
    }

    /// Updates a general query the principal may see.
    pub async fn update_general_query(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        general_query_id: i64,
        draft: GeneralQueryDraft,
    ) -> AppResult<GeneralQuery> {
        self.require_writable(
            principal,
            selection,
            ResourceKind::GeneralQuery,
            general_query_id,
        )
        .await?;

        self.general_queries
            .update(general_query_id, draft)
            .await?
            .ok_or_else(|| missing(ResourceKind::GeneralQuery, general_query_id))
    }

    /// Links an existing general query to another navigation.
    pub async fn link_general_query(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        navigation_id: i64,
        general_query_id: i64,
    ) -> AppResult<()> {
        self.require_writable(principal, selection, ResourceKind::Navigation, navigation_id)
            .await?;
        self.require_writable(
            principal,
            selection,
            ResourceKind::GeneralQuery,
            general_query_id,
        )
        .await?;

        self.links
            .link_general_query(navigation_id, general_query_id)
            .await
    }

    /// Removes a navigation/general-query link.
    pub async fn unlink_general_query(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        navigation_id: i64,
        general_query_id: i64,
    ) -> AppResult<()> {
        self.require_writable(principal, selection, ResourceKind::Navigation, navigation_id)
            .await?;

        if !self
            .links
            .unlink_general_query(navigation_id, general_query_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "general query {general_query_id} is not linked to navigation {navigation_id}"
            )));
        }

        Ok(())
    }

    async fn require_writable(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        kind: ResourceKind,
        id: i64,
    ) -> AppResult<()> {
        self.access
            .require_resource(principal, ResourceRef::new(kind, id), selection)
            .await?;
        require_catalog_writer(principal)
    }
}

fn require_catalog_writer(principal: &Principal) -> AppResult<()> {
    if principal.role().is_admin_or_above() {
        Ok(())
    } else {
        Err(insufficient_permissions())
    }
}

fn missing(kind: ResourceKind, id: i64) -> AppError {
    AppError::NotFound(format!("{kind} {id} does not exist"))
}
