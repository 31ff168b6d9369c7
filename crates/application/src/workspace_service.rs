use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, Principal};
use insightdeck_domain::{
    Analysis, AnalysisDraft, AnalysisQuery, AnalysisQueryDraft, Dashboard, DashboardDraft,
    QueryResult, QueryResultDraft, ResourceKind, ResourceRef, TenantSelection,
};
use tracing::info;

use crate::{AccessService, ResourceStore};

/// Write operations on the analysis family: analyses, dashboards, queries
/// and query results.
#[derive(Clone)]
pub struct WorkspaceService {
    access: AccessService,
    analyses: Arc<dyn ResourceStore<Analysis>>,
    dashboards: Arc<dyn ResourceStore<Dashboard>>,
    queries: Arc<dyn ResourceStore<AnalysisQuery>>,
    results: Arc<dyn ResourceStore<QueryResult>>,
}

impl WorkspaceService {
    /// Creates a new workspace service.
    #[must_use]
    pub fn new(
        access: AccessService,
        analyses: Arc<dyn ResourceStore<Analysis>>,
        dashboards: Arc<dyn ResourceStore<Dashboard>>,
        queries: Arc<dyn ResourceStore<AnalysisQuery>>,
        results: Arc<dyn ResourceStore<QueryResult>>,
    ) -> Self {
        Self {
            access,
            analyses,
            dashboards,
            queries,
            results,
        }
    }

    /// Creates an analysis owned by the principal.
    pub async fn create_analysis(&self, principal: &Principal, title: &str) -> AppResult<Analysis> {
        let analysis = self
            .analyses
            .insert(AnalysisDraft::new(principal.user_id(), title)?)
            .await?;

        info!(user_id = %principal.user_id(), analysis_id = analysis.id, "created analysis");
        Ok(analysis)
    }

    /// Renames an analysis the principal may see. Ownership is unchanged.
    pub async fn rename_analysis(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        analysis_id: i64,
        title: &str,
    ) -> AppResult<Analysis> {
        self.require(principal, selection, ResourceKind::Analysis, analysis_id)
            .await?;
        let current = self
            .analyses
            .find_by_id(analysis_id)
            .await?
            .ok_or_else(|| missing(ResourceKind::Analysis, analysis_id))?;

        self.analyses
            .update(analysis_id, AnalysisDraft::new(current.owner_id, title)?)
            .await?
            .ok_or_else(|| missing(ResourceKind::Analysis, analysis_id))
    }

    /// Creates a dashboard inside an analysis the principal may see.
    pub async fn create_dashboard(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        draft: DashboardDraft,
    ) -> AppResult<Dashboard> {
        self.require(principal, selection, ResourceKind::Analysis, draft.analysis_id())
            .await?;

        let dashboard = self.dashboards.insert(draft).await?;
        info!(
            user_id = %principal.user_id(),
            dashboard_id = dashboard.id,
            analysis_id = dashboard.analysis_id,
            "created dashboard"
        );
        Ok(dashboard)
    }

    /// Renames a dashboard the principal may see.
    pub async fn rename_dashboard(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        dashboard_id: i64,
        title: &str,
    ) -> AppResult<Dashboard> {
        self.require(principal, selection, ResourceKind::Dashboard, dashboard_id)
            .await?;
        let current = self
            .dashboards
            .find_by_id(dashboard_id)
            .await?
            .ok_or_else(|| missing(ResourceKind::Dashboard, dashboard_id))?;

        self.dashboards
            .update(
                dashboard_id,
                DashboardDraft::new(current.analysis_id, title)?,
            )
            .await?
            .ok_or_else(|| missing(ResourceKind::Dashboard, dashboard_id))
    }

    /// Creates a query. The analysis, dashboard and context table must all be
    /// visible, and the dashboard must belong to the analysis.
    pub async fn create_query(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        draft: AnalysisQueryDraft,
    ) -> AppResult<AnalysisQuery> {
        self.require(principal, selection, ResourceKind::Analysis, draft.analysis_id())
            .await?;
        self.require(principal, selection, ResourceKind::Dashboard, draft.dashboard_id())
            .await?;
        self.require(principal, selection, ResourceKind::ContextTable, draft.context_id())
            .await?;

        let dashboard = self
            .dashboards
            .find_by_id(draft.dashboard_id())
            .await?
            .ok_or_else(|| missing(ResourceKind::Dashboard, draft.dashboard_id()))?;
        if dashboard.analysis_id != draft.analysis_id() {
            return Err(AppError::Validation(format!(
                "dashboard {} does not belong to analysis {}",
                dashboard.id,
                draft.analysis_id()
            )));
        }

        let query = self.queries.insert(draft).await?;
        info!(user_id = %principal.user_id(), query_id = query.id, "created query");
        Ok(query)
    }

    /// Records the result of a query the principal may see.
    pub async fn record_query_result(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        draft: QueryResultDraft,
    ) -> AppResult<QueryResult> {
        self.require(principal, selection, ResourceKind::Query, draft.query_id())
            .await?;

        let result = self.results.insert(draft).await?;
        info!(
            user_id = %principal.user_id(),
            query_id = result.query_id,
            result_id = result.id,
            "recorded query result"
        );
        Ok(result)
    }

    async fn require(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
        kind: ResourceKind,
        id: i64,
    ) -> AppResult<()> {
        self.access
            .require_resource(principal, ResourceRef::new(kind, id), selection)
            .await
    }
}

fn missing(kind: ResourceKind, id: i64) -> AppError {
    AppError::NotFound(format!("{kind} {id} does not exist"))
}
