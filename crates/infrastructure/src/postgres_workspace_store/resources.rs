use insightdeck_domain::{
    Analysis, AnalysisDraft, AnalysisQuery, AnalysisQueryDraft, ChartType, ContextTable,
    ContextTableDraft, Dashboard, DashboardDraft, GeneralQuery, GeneralQueryDraft, Navigation,
    NavigationDraft, QueryResult, QueryResultDraft,
};
use sqlx::FromRow;
use sqlx::postgres::PgRow;

use super::rows::{
    AnalysisQueryRow, AnalysisRow, ContextTableRow, DashboardRow, GeneralQueryRow,
    NavigationRow, QueryResultRow,
};
use super::*;

/// Row mapping and write statements for one resource kind.
#[async_trait]
trait StoredResource: ScopedResource {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    /// Select list over the row alias `r`.
    const COLUMNS: &'static str;

    fn from_row(row: Self::Row) -> AppResult<Self>;

    /// Narrows a listing to one parent. Unsupported parents match nothing.
    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, _parent: &ResourceParent) {
        builder.push(" AND FALSE");
    }

    async fn insert_row(pool: &PgPool, draft: Self::Draft) -> Result<Self::Row, sqlx::Error>;

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: Self::Draft,
    ) -> Result<Option<Self::Row>, sqlx::Error>;
}

fn filtered_query<R: StoredResource>(
    select: &str,
    query: &ResourceListQuery,
) -> QueryBuilder<'static, Postgres> {
    let layout = layout(R::KIND);
    let mut builder =
        QueryBuilder::new(format!("SELECT {select} FROM {} r WHERE TRUE", layout.table));

    match &query.parent {
        Some(parent) => R::push_parent(&mut builder, parent),
        None if query.scope == RowScope::ParentOnly => {
            builder.push(" AND FALSE");
        }
        None => {}
    }
    push_scope(&mut builder, layout.anchor, &query.scope);
    builder
}

#[async_trait]
impl<R: StoredResource> ResourceStore<R> for PostgresWorkspaceStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} r WHERE r.id = $1",
            R::COLUMNS,
            layout(R::KIND).table
        );
        let row = sqlx::query_as::<_, R::Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| read_error(error, R::KIND.as_str()))?;

        row.map(R::from_row).transpose()
    }

    async fn list(&self, query: &ResourceListQuery) -> AppResult<Vec<R>> {
        let mut builder = filtered_query::<R>(R::COLUMNS, query);
        builder.push(" ORDER BY r.id");
        push_page(&mut builder, query.page);

        let rows = builder
            .build_query_as::<R::Row>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list {} records: {error}", R::KIND))
            })?;

        rows.into_iter().map(R::from_row).collect()
    }

    async fn count(&self, query: &ResourceListQuery) -> AppResult<i64> {
        filtered_query::<R>("COUNT(*)", query)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count {} records: {error}", R::KIND))
            })
    }

    async fn insert(&self, draft: R::Draft) -> AppResult<R> {
        let row = R::insert_row(&self.pool, draft)
            .await
            .map_err(|error| write_error(error, R::KIND.as_str()))?;

        R::from_row(row)
    }

    async fn update(&self, id: i64, draft: R::Draft) -> AppResult<Option<R>> {
        let row = R::update_row(&self.pool, id, draft)
            .await
            .map_err(|error| write_error(error, R::KIND.as_str()))?;

        row.map(R::from_row).transpose()
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", layout(R::KIND).table);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                delete_error(error, ResourceRef::new(R::KIND, id).to_string().as_str())
            })?;

        Ok(result.rows_affected() > 0)
    }
}

fn push_column_match(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: i64) {
    builder.push(format!(" AND r.{column} = "));
    builder.push_bind(value);
}

fn push_link_match(
    builder: &mut QueryBuilder<'_, Postgres>,
    link_table: &str,
    parent_column: &str,
    child_column: &str,
    parent_id: i64,
) {
    builder.push(format!(
        " AND EXISTS (SELECT 1 FROM {link_table} l \
         WHERE l.{child_column} = r.id AND l.{parent_column} = "
    ));
    builder.push_bind(parent_id);
    builder.push(")");
}

#[async_trait]
impl StoredResource for Analysis {
    type Row = AnalysisRow;

    const COLUMNS: &'static str = "r.id, r.owner_id, r.title, r.created_at";

    fn from_row(row: AnalysisRow) -> AppResult<Self> {
        Ok(row.into())
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Owner(owner_id) => {
                push_column_match(builder, "owner_id", owner_id.as_i64());
            }
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(pool: &PgPool, draft: AnalysisDraft) -> Result<AnalysisRow, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO analyses AS r (owner_id, title)
            VALUES ($1, $2)
            RETURNING r.id, r.owner_id, r.title, r.created_at
            "#,
        )
        .bind(draft.owner_id().as_i64())
        .bind(draft.title())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: AnalysisDraft,
    ) -> Result<Option<AnalysisRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRow>(
            r#"
            UPDATE analyses AS r
            SET title = $2
            WHERE r.id = $1
            RETURNING r.id, r.owner_id, r.title, r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.title())
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for Dashboard {
    type Row = DashboardRow;

    const COLUMNS: &'static str = "r.id, r.analysis_id, r.title, r.created_at";

    fn from_row(row: DashboardRow) -> AppResult<Self> {
        Ok(row.into())
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Analysis(analysis_id) => {
                push_column_match(builder, "analysis_id", *analysis_id);
            }
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(
        pool: &PgPool,
        draft: DashboardDraft,
    ) -> Result<DashboardRow, sqlx::Error> {
        sqlx::query_as::<_, DashboardRow>(
            r#"
            INSERT INTO dashboards AS r (analysis_id, title)
            VALUES ($1, $2)
            RETURNING r.id, r.analysis_id, r.title, r.created_at
            "#,
        )
        .bind(draft.analysis_id())
        .bind(draft.title())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: DashboardDraft,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        sqlx::query_as::<_, DashboardRow>(
            r#"
            UPDATE dashboards AS r
            SET title = $2
            WHERE r.id = $1
            RETURNING r.id, r.analysis_id, r.title, r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.title())
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for AnalysisQuery {
    type Row = AnalysisQueryRow;

    const COLUMNS: &'static str =
        "r.id, r.analysis_id, r.dashboard_id, r.context_id, r.query_text, r.created_at";

    fn from_row(row: AnalysisQueryRow) -> AppResult<Self> {
        Ok(row.into())
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Analysis(analysis_id) => {
                push_column_match(builder, "analysis_id", *analysis_id);
            }
            ResourceParent::Dashboard(dashboard_id) => {
                push_column_match(builder, "dashboard_id", *dashboard_id);
            }
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(
        pool: &PgPool,
        draft: AnalysisQueryDraft,
    ) -> Result<AnalysisQueryRow, sqlx::Error> {
        sqlx::query_as::<_, AnalysisQueryRow>(
            r#"
            INSERT INTO analysis_queries AS r (analysis_id, dashboard_id, context_id, query_text)
            VALUES ($1, $2, $3, $4)
            RETURNING r.id, r.analysis_id, r.dashboard_id, r.context_id, r.query_text, r.created_at
            "#,
        )
        .bind(draft.analysis_id())
        .bind(draft.dashboard_id())
        .bind(draft.context_id())
        .bind(draft.query_text())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: AnalysisQueryDraft,
    ) -> Result<Option<AnalysisQueryRow>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisQueryRow>(
            r#"
            UPDATE analysis_queries AS r
            SET query_text = $2
            WHERE r.id = $1
            RETURNING r.id, r.analysis_id, r.dashboard_id, r.context_id, r.query_text, r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.query_text())
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for QueryResult {
    type Row = QueryResultRow;

    const COLUMNS: &'static str = "r.id, r.query_id, r.csv_file_name, r.chart_type, r.summary, \
                                   r.suggested_charts, r.created_at";

    fn from_row(row: QueryResultRow) -> AppResult<Self> {
        row.try_into()
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Query(query_id) => push_column_match(builder, "query_id", *query_id),
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(
        pool: &PgPool,
        draft: QueryResultDraft,
    ) -> Result<QueryResultRow, sqlx::Error> {
        sqlx::query_as::<_, QueryResultRow>(
            r#"
            INSERT INTO query_results AS r (
                query_id,
                csv_file_name,
                chart_type,
                summary,
                suggested_charts
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                r.id,
                r.query_id,
                r.csv_file_name,
                r.chart_type,
                r.summary,
                r.suggested_charts,
                r.created_at
            "#,
        )
        .bind(draft.query_id())
        .bind(draft.csv_file_name())
        .bind(draft.chart_type().map(|chart| chart.as_str()))
        .bind(draft.summary())
        .bind(ChartType::join_list(draft.suggested_charts()))
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: QueryResultDraft,
    ) -> Result<Option<QueryResultRow>, sqlx::Error> {
        sqlx::query_as::<_, QueryResultRow>(
            r#"
            UPDATE query_results AS r
            SET csv_file_name = $2, chart_type = $3, summary = $4, suggested_charts = $5
            WHERE r.id = $1
            RETURNING
                r.id,
                r.query_id,
                r.csv_file_name,
                r.chart_type,
                r.summary,
                r.suggested_charts,
                r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.csv_file_name())
        .bind(draft.chart_type().map(|chart| chart.as_str()))
        .bind(draft.summary())
        .bind(ChartType::join_list(draft.suggested_charts()))
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for ContextTable {
    type Row = ContextTableRow;

    const COLUMNS: &'static str = "r.id, r.name, r.schema_info, r.llm_schema, r.created_at";

    fn from_row(row: ContextTableRow) -> AppResult<Self> {
        Ok(row.into())
    }

    async fn insert_row(
        pool: &PgPool,
        draft: ContextTableDraft,
    ) -> Result<ContextTableRow, sqlx::Error> {
        sqlx::query_as::<_, ContextTableRow>(
            r#"
            INSERT INTO context_tables AS r (name, schema_info, llm_schema)
            VALUES ($1, $2, $3)
            RETURNING r.id, r.name, r.schema_info, r.llm_schema, r.created_at
            "#,
        )
        .bind(draft.name())
        .bind(draft.schema_info())
        .bind(draft.llm_schema())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: ContextTableDraft,
    ) -> Result<Option<ContextTableRow>, sqlx::Error> {
        sqlx::query_as::<_, ContextTableRow>(
            r#"
            UPDATE context_tables AS r
            SET name = $2, schema_info = $3, llm_schema = $4
            WHERE r.id = $1
            RETURNING r.id, r.name, r.schema_info, r.llm_schema, r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.name())
        .bind(draft.schema_info())
        .bind(draft.llm_schema())
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for Navigation {
    type Row = NavigationRow;

    const COLUMNS: &'static str = "r.id, r.title, r.stem, r.description, r.created_at";

    fn from_row(row: NavigationRow) -> AppResult<Self> {
        Ok(row.into())
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Context(context_id) => push_link_match(
                builder,
                "context_navigation_links",
                "context_id",
                "navigation_id",
                *context_id,
            ),
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(
        pool: &PgPool,
        draft: NavigationDraft,
    ) -> Result<NavigationRow, sqlx::Error> {
        sqlx::query_as::<_, NavigationRow>(
            r#"
            INSERT INTO navigations AS r (title, stem, description)
            VALUES ($1, $2, $3)
            RETURNING r.id, r.title, r.stem, r.description, r.created_at
            "#,
        )
        .bind(draft.title())
        .bind(draft.stem())
        .bind(draft.description())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: NavigationDraft,
    ) -> Result<Option<NavigationRow>, sqlx::Error> {
        sqlx::query_as::<_, NavigationRow>(
            r#"
            UPDATE navigations AS r
            SET title = $2, stem = $3, description = $4
            WHERE r.id = $1
            RETURNING r.id, r.title, r.stem, r.description, r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.title())
        .bind(draft.stem())
        .bind(draft.description())
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl StoredResource for GeneralQuery {
    type Row = GeneralQueryRow;

    const COLUMNS: &'static str = "r.id, r.sql_text, r.query_text, r.description, \
                                   r.csv_file_path, r.chart_type, r.suggested_chart_types, \
                                   r.summary, r.created_at";

    fn from_row(row: GeneralQueryRow) -> AppResult<Self> {
        row.try_into()
    }

    fn push_parent(builder: &mut QueryBuilder<'_, Postgres>, parent: &ResourceParent) {
        match parent {
            ResourceParent::Navigation(navigation_id) => push_link_match(
                builder,
                "navigation_general_query_links",
                "navigation_id",
                "general_query_id",
                *navigation_id,
            ),
            _ => {
                builder.push(" AND FALSE");
            }
        }
    }

    async fn insert_row(
        pool: &PgPool,
        draft: GeneralQueryDraft,
    ) -> Result<GeneralQueryRow, sqlx::Error> {
        sqlx::query_as::<_, GeneralQueryRow>(
            r#"
            INSERT INTO general_queries AS r (
                sql_text,
                query_text,
                description,
                csv_file_path,
                chart_type,
                suggested_chart_types,
                summary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                r.id,
                r.sql_text,
                r.query_text,
                r.description,
                r.csv_file_path,
                r.chart_type,
                r.suggested_chart_types,
                r.summary,
                r.created_at
            "#,
        )
        .bind(draft.sql())
        .bind(draft.query_text())
        .bind(draft.description())
        .bind(draft.csv_file_path())
        .bind(draft.chart_type().map(|chart| chart.as_str()))
        .bind(ChartType::join_list(draft.suggested_chart_types()))
        .bind(draft.summary())
        .fetch_one(pool)
        .await
    }

    async fn update_row(
        pool: &PgPool,
        id: i64,
        draft: GeneralQueryDraft,
    ) -> Result<Option<GeneralQueryRow>, sqlx::Error> {
        sqlx::query_as::<_, GeneralQueryRow>(
            r#"
            UPDATE general_queries AS r
            SET
                sql_text = $2,
                query_text = $3,
                description = $4,
                csv_file_path = $5,
                chart_type = $6,
                suggested_chart_types = $7,
                summary = $8
            WHERE r.id = $1
            RETURNING
                r.id,
                r.sql_text,
                r.query_text,
                r.description,
                r.csv_file_path,
                r.chart_type,
                r.suggested_chart_types,
                r.summary,
                r.created_at
            "#,
        )
        .bind(id)
        .bind(draft.sql())
        .bind(draft.query_text())
        .bind(draft.description())
        .bind(draft.csv_file_path())
        .bind(draft.chart_type().map(|chart| chart.as_str()))
        .bind(ChartType::join_list(draft.suggested_chart_types()))
        .bind(draft.summary())
        .fetch_optional(pool)
        .await
    }
}
