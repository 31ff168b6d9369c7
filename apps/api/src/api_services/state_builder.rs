use std::sync::Arc;

use insightdeck_application::{
    AccessService, CatalogLinkRepository, CatalogService, CatalogStores, DirectoryService,
    EntityRepository, MembershipRepository, ResourceAnchorRepository, ResourceService,
    ResourceStore, TenancyService, UserRepository, WorkspaceService,
};
use insightdeck_domain::{
    Analysis, AnalysisQuery, ContextTable, Dashboard, GeneralQuery, Navigation, QueryResult,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// A single storage adapter serving every workspace port.
pub trait WorkspaceStore:
    MembershipRepository
    + ResourceAnchorRepository
    + EntityRepository
    + UserRepository
    + CatalogLinkRepository
    + ResourceStore<Analysis>
    + ResourceStore<Dashboard>
    + ResourceStore<AnalysisQuery>
    + ResourceStore<QueryResult>
    + ResourceStore<ContextTable>
    + ResourceStore<Navigation>
    + ResourceStore<GeneralQuery>
    + 'static
{
}

impl<T> WorkspaceStore for T where
    T: MembershipRepository
        + ResourceAnchorRepository
        + EntityRepository
        + UserRepository
        + CatalogLinkRepository
        + ResourceStore<Analysis>
        + ResourceStore<Dashboard>
        + ResourceStore<AnalysisQuery>
        + ResourceStore<QueryResult>
        + ResourceStore<ContextTable>
        + ResourceStore<Navigation>
        + ResourceStore<GeneralQuery>
        + 'static
{
}

pub fn build_app_state<S: WorkspaceStore>(store: Arc<S>, config: &ApiConfig) -> AppState {
    let access = AccessService::new(store.clone(), store.clone());

    AppState {
        analyses: ResourceService::<Analysis>::new(access.clone(), store.clone()),
        dashboards: ResourceService::<Dashboard>::new(access.clone(), store.clone()),
        queries: ResourceService::<AnalysisQuery>::new(access.clone(), store.clone()),
        query_results: ResourceService::<QueryResult>::new(access.clone(), store.clone()),
        contexts: ResourceService::<ContextTable>::new(access.clone(), store.clone()),
        navigations: ResourceService::<Navigation>::new(access.clone(), store.clone()),
        general_queries: ResourceService::<GeneralQuery>::new(access.clone(), store.clone()),
        workspace_service: WorkspaceService::new(
            access.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ),
        catalog_service: CatalogService::new(
            access.clone(),
            store.clone(),
            store.clone(),
            CatalogStores {
                contexts: store.clone(),
                navigations: store.clone(),
                general_queries: store.clone(),
                links: store.clone(),
            },
        ),
        tenancy_service: TenancyService::new(access.clone(), store.clone(), store.clone()),
        directory_service: DirectoryService::new(access.clone(), store.clone(), store.clone()),
        access_service: access,
        membership_repository: store,
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
