use std::sync::Arc;

use insightdeck_application::{
    AccessService, CatalogService, DirectoryService, MembershipRepository, ResourceService,
    TenancyService, WorkspaceService,
};
use insightdeck_domain::{
    Analysis, AnalysisQuery, ContextTable, Dashboard, GeneralQuery, Navigation, QueryResult,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub analyses: ResourceService<Analysis>,
    pub dashboards: ResourceService<Dashboard>,
    pub queries: ResourceService<AnalysisQuery>,
    pub query_results: ResourceService<QueryResult>,
    pub contexts: ResourceService<ContextTable>,
    pub navigations: ResourceService<Navigation>,
    pub general_queries: ResourceService<GeneralQuery>,
    pub workspace_service: WorkspaceService,
    pub catalog_service: CatalogService,
    pub tenancy_service: TenancyService,
    pub directory_service: DirectoryService,
    pub membership_repository: Arc<dyn MembershipRepository>,
    pub bootstrap_token: String,
}
