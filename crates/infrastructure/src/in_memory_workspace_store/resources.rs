use insightdeck_domain::{
    AnalysisDraft, AnalysisQueryDraft, ContextTableDraft, DashboardDraft,
    GeneralQueryDraft, NavigationDraft, QueryResultDraft,
};

use super::*;

/// Table access and lifecycle rules for one resource kind.
trait StoredResource: ScopedResource {
    const SEQUENCE: &'static str;

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self>;

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self>;

    fn build(id: i64, draft: Self::Draft, created_at: DateTime<Utc>) -> Self;

    fn apply(&mut self, draft: Self::Draft);

    fn check_insert(_tables: &WorkspaceTables, _draft: &Self::Draft) -> AppResult<()> {
        Ok(())
    }

    fn check_update(_tables: &WorkspaceTables, _id: i64, _draft: &Self::Draft) -> AppResult<()> {
        Ok(())
    }

    fn matches_parent(&self, _tables: &WorkspaceTables, _parent: &ResourceParent) -> bool {
        false
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        Self::table_mut(tables).remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<R: StoredResource> ResourceStore<R> for InMemoryWorkspaceStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<R>> {
        Ok(R::table(&*self.tables.read().await).get(&id).cloned())
    }

    async fn list(&self, query: &ResourceListQuery) -> AppResult<Vec<R>> {
        let tables = self.tables.read().await;
        Ok(page_slice(matching_rows::<R>(&tables, query), query.page))
    }

    async fn count(&self, query: &ResourceListQuery) -> AppResult<i64> {
        let tables = self.tables.read().await;
        count_of(&matching_rows::<R>(&tables, query))
    }

    async fn insert(&self, draft: R::Draft) -> AppResult<R> {
        let mut tables = self.tables.write().await;
        R::check_insert(&tables, &draft)?;

        let id = tables.next_id(R::SEQUENCE);
        let record = R::build(id, draft, Utc::now());
        R::table_mut(&mut tables).insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: i64, draft: R::Draft) -> AppResult<Option<R>> {
        let mut tables = self.tables.write().await;
        if !R::table(&tables).contains_key(&id) {
            return Ok(None);
        }
        R::check_update(&tables, id, &draft)?;

        Ok(R::table_mut(&mut tables).get_mut(&id).map(|record| {
            record.apply(draft);
            record.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !R::table(&tables).contains_key(&id) {
            return Ok(false);
        }

        R::remove(&mut tables, id)?;
        Ok(true)
    }
}

fn matching_rows<R: StoredResource>(tables: &WorkspaceTables, query: &ResourceListQuery) -> Vec<R> {
    if query.scope == RowScope::ParentOnly && query.parent.is_none() {
        return Vec::new();
    }

    R::table(tables)
        .values()
        .filter(|record| {
            query
                .parent
                .as_ref()
                .is_none_or(|parent| record.matches_parent(tables, parent))
        })
        .filter(|record| {
            query.scope == RowScope::ParentOnly
                || tables
                    .anchor_of(record.resource_ref())
                    .is_some_and(|anchor| tables.anchor_in_scope(&anchor, &query.scope))
        })
        .cloned()
        .collect()
}

fn conflict_if(taken: bool, message: impl FnOnce() -> String) -> AppResult<()> {
    if taken {
        Err(AppError::Conflict(message()))
    } else {
        Ok(())
    }
}

impl StoredResource for Analysis {
    const SEQUENCE: &'static str = "analysis";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.analyses
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.analyses
    }

    fn build(id: i64, draft: AnalysisDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: draft.owner_id(),
            title: draft.title().to_owned(),
            created_at,
        }
    }

    fn apply(&mut self, draft: AnalysisDraft) {
        self.title = draft.title().to_owned();
    }

    fn check_insert(tables: &WorkspaceTables, draft: &AnalysisDraft) -> AppResult<()> {
        if tables.users.contains_key(&draft.owner_id()) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "user {} does not exist",
                draft.owner_id()
            )))
        }
    }

    fn matches_parent(&self, _tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        matches!(parent, ResourceParent::Owner(owner_id) if *owner_id == self.owner_id)
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        tables.remove_analysis(id);
        Ok(())
    }
}

impl StoredResource for Dashboard {
    const SEQUENCE: &'static str = "dashboard";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.dashboards
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.dashboards
    }

    fn build(id: i64, draft: DashboardDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            analysis_id: draft.analysis_id(),
            title: draft.title().to_owned(),
            created_at,
        }
    }

    fn apply(&mut self, draft: DashboardDraft) {
        self.title = draft.title().to_owned();
    }

    fn check_insert(tables: &WorkspaceTables, draft: &DashboardDraft) -> AppResult<()> {
        if tables.analyses.contains_key(&draft.analysis_id()) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "analysis {} does not exist",
                draft.analysis_id()
            )))
        }
    }

    fn matches_parent(&self, _tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        matches!(parent, ResourceParent::Analysis(analysis_id) if *analysis_id == self.analysis_id)
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        tables.dashboards.remove(&id);
        let query_ids = tables
            .queries
            .values()
            .filter(|query| query.dashboard_id == id)
            .map(|query| query.id)
            .collect();
        tables.remove_queries(&query_ids);
        Ok(())
    }
}

impl StoredResource for AnalysisQuery {
    const SEQUENCE: &'static str = "query";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.queries
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.queries
    }

    fn build(id: i64, draft: AnalysisQueryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            analysis_id: draft.analysis_id(),
            dashboard_id: draft.dashboard_id(),
            context_id: draft.context_id(),
            query_text: draft.query_text().to_owned(),
            created_at,
        }
    }

    fn apply(&mut self, draft: AnalysisQueryDraft) {
        self.query_text = draft.query_text().to_owned();
    }

    fn check_insert(tables: &WorkspaceTables, draft: &AnalysisQueryDraft) -> AppResult<()> {
        let missing = if !tables.analyses.contains_key(&draft.analysis_id()) {
            Some(ResourceRef::new(ResourceKind::Analysis, draft.analysis_id()))
        } else if !tables.dashboards.contains_key(&draft.dashboard_id()) {
            Some(ResourceRef::new(ResourceKind::Dashboard, draft.dashboard_id()))
        } else if !tables.contexts.contains_key(&draft.context_id()) {
            Some(ResourceRef::new(ResourceKind::ContextTable, draft.context_id()))
        } else {
            None
        };

        match missing {
            Some(resource) => Err(AppError::NotFound(format!("{resource} does not exist"))),
            None => Ok(()),
        }
    }

    fn matches_parent(&self, _tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        match parent {
            ResourceParent::Analysis(analysis_id) => *analysis_id == self.analysis_id,
            ResourceParent::Dashboard(dashboard_id) => *dashboard_id == self.dashboard_id,
            _ => false,
        }
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        tables.remove_queries(&BTreeSet::from([id]));
        Ok(())
    }
}

impl StoredResource for QueryResult {
    const SEQUENCE: &'static str = "query_result";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.results
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.results
    }

    fn build(id: i64, draft: QueryResultDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            query_id: draft.query_id(),
            csv_file_name: draft.csv_file_name().to_owned(),
            chart_type: draft.chart_type(),
            summary: draft.summary().map(str::to_owned),
            suggested_charts: draft.suggested_charts().to_vec(),
            created_at,
        }
    }

    fn apply(&mut self, draft: QueryResultDraft) {
        self.csv_file_name = draft.csv_file_name().to_owned();
        self.chart_type = draft.chart_type();
        self.summary = draft.summary().map(str::to_owned);
        self.suggested_charts = draft.suggested_charts().to_vec();
    }

    fn check_insert(tables: &WorkspaceTables, draft: &QueryResultDraft) -> AppResult<()> {
        if tables.queries.contains_key(&draft.query_id()) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "query {} does not exist",
                draft.query_id()
            )))
        }
    }

    fn matches_parent(&self, _tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        matches!(parent, ResourceParent::Query(query_id) if *query_id == self.query_id)
    }
}

impl StoredResource for ContextTable {
    const SEQUENCE: &'static str = "context_table";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.contexts
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.contexts
    }

    fn build(id: i64, draft: ContextTableDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name().to_owned(),
            schema_info: draft.schema_info().to_owned(),
            llm_schema: draft.llm_schema().to_owned(),
            created_at,
        }
    }

    fn apply(&mut self, draft: ContextTableDraft) {
        self.name = draft.name().to_owned();
        self.schema_info = draft.schema_info().to_owned();
        self.llm_schema = draft.llm_schema().to_owned();
    }

    fn check_insert(tables: &WorkspaceTables, draft: &ContextTableDraft) -> AppResult<()> {
        Self::check_update(tables, 0, draft)
    }

    fn check_update(tables: &WorkspaceTables, id: i64, draft: &ContextTableDraft) -> AppResult<()> {
        conflict_if(
            tables
                .contexts
                .values()
                .any(|context| context.id != id && context.name == draft.name()),
            || format!("context table '{}' already exists", draft.name()),
        )
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        conflict_if(
            tables.queries.values().any(|query| query.context_id == id),
            || format!("context table {id} is still referenced by queries"),
        )?;

        tables.contexts.remove(&id);
        tables
            .context_links
            .retain(|(_, context_id)| *context_id != id);
        tables
            .navigation_links
            .retain(|(context_id, _)| *context_id != id);
        Ok(())
    }
}

impl StoredResource for Navigation {
    const SEQUENCE: &'static str = "navigation";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.navigations
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.navigations
    }

    fn build(id: i64, draft: NavigationDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title().to_owned(),
            stem: draft.stem().to_owned(),
            description: draft.description().map(str::to_owned),
            created_at,
        }
    }

    fn apply(&mut self, draft: NavigationDraft) {
        self.title = draft.title().to_owned();
        self.stem = draft.stem().to_owned();
        self.description = draft.description().map(str::to_owned);
    }

    fn check_insert(tables: &WorkspaceTables, draft: &NavigationDraft) -> AppResult<()> {
        Self::check_update(tables, 0, draft)
    }

    fn check_update(tables: &WorkspaceTables, id: i64, draft: &NavigationDraft) -> AppResult<()> {
        conflict_if(
            tables
                .navigations
                .values()
                .any(|navigation| navigation.id != id && navigation.stem == draft.stem()),
            || format!("navigation stem '{}' already exists", draft.stem()),
        )
    }

    fn matches_parent(&self, tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        matches!(parent, ResourceParent::Context(context_id)
            if tables.navigation_links.contains(&(*context_id, self.id)))
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        tables.navigations.remove(&id);
        tables
            .navigation_links
            .retain(|(_, navigation_id)| *navigation_id != id);
        tables
            .general_query_links
            .retain(|(navigation_id, _)| *navigation_id != id);
        Ok(())
    }
}

impl StoredResource for GeneralQuery {
    const SEQUENCE: &'static str = "general_query";

    fn table(tables: &WorkspaceTables) -> &BTreeMap<i64, Self> {
        &tables.general_queries
    }

    fn table_mut(tables: &mut WorkspaceTables) -> &mut BTreeMap<i64, Self> {
        &mut tables.general_queries
    }

    fn build(id: i64, draft: GeneralQueryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            sql: draft.sql().to_owned(),
            query_text: draft.query_text().to_owned(),
            description: draft.description().map(str::to_owned),
            csv_file_path: draft.csv_file_path().map(str::to_owned),
            chart_type: draft.chart_type(),
            suggested_chart_types: draft.suggested_chart_types().to_vec(),
            summary: draft.summary().map(str::to_owned),
            created_at,
        }
    }

    fn apply(&mut self, draft: GeneralQueryDraft) {
        let created_at = self.created_at;
        *self = Self::build(self.id, draft, created_at);
    }

    fn matches_parent(&self, tables: &WorkspaceTables, parent: &ResourceParent) -> bool {
        matches!(parent, ResourceParent::Navigation(navigation_id)
            if tables.general_query_links.contains(&(*navigation_id, self.id)))
    }

    fn remove(tables: &mut WorkspaceTables, id: i64) -> AppResult<()> {
        tables.general_queries.remove(&id);
        tables
            .general_query_links
            .retain(|(_, query_id)| *query_id != id);
        Ok(())
    }
}
