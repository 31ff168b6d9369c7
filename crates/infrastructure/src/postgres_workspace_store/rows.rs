use chrono::{DateTime, Utc};
use insightdeck_core::{AppError, AppResult, EntityId, Role, UserId};
use insightdeck_domain::{
    Analysis, AnalysisQuery, ChartType, ContextTable, Dashboard, Entity, EntityMembership,
    GeneralQuery, Navigation, QueryResult, UserAccount,
};
use sqlx::FromRow;

pub(super) const USER_COLUMNS: &str = "id, name, email, role, active, created_at";

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    id: i64,
    name: String,
    email: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let role = row.role.parse::<Role>().map_err(|error| {
            AppError::Internal(format!("user {} has a corrupt role: {error}", row.id))
        })?;

        Ok(Self {
            id: UserId::from_i64(row.id),
            name: row.name,
            email: row.email,
            role,
            active: row.active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct EntityRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EntityRow> for Entity {
    fn from(row: EntityRow) -> Self {
        Self {
            id: EntityId::from_i64(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct MembershipRow {
    id: i64,
    entity_id: i64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<MembershipRow> for EntityMembership {
    fn from(row: MembershipRow) -> Self {
        Self {
            membership_id: row.id,
            entity_id: EntityId::from_i64(row.entity_id),
            user_id: UserId::from_i64(row.user_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct AnalysisRow {
    id: i64,
    owner_id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            owner_id: UserId::from_i64(row.owner_id),
            title: row.title,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct DashboardRow {
    id: i64,
    analysis_id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

impl From<DashboardRow> for Dashboard {
    fn from(row: DashboardRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            title: row.title,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct AnalysisQueryRow {
    id: i64,
    analysis_id: i64,
    dashboard_id: i64,
    context_id: i64,
    query_text: String,
    created_at: DateTime<Utc>,
}

impl From<AnalysisQueryRow> for AnalysisQuery {
    fn from(row: AnalysisQueryRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            dashboard_id: row.dashboard_id,
            context_id: row.context_id,
            query_text: row.query_text,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct QueryResultRow {
    id: i64,
    query_id: i64,
    csv_file_name: String,
    chart_type: Option<String>,
    summary: Option<String>,
    suggested_charts: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<QueryResultRow> for QueryResult {
    type Error = AppError;

    fn try_from(row: QueryResultRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            query_id: row.query_id,
            csv_file_name: row.csv_file_name,
            chart_type: parse_chart(row.chart_type.as_deref())?,
            summary: row.summary,
            suggested_charts: ChartType::parse_list(row.suggested_charts.as_str())?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct ContextTableRow {
    id: i64,
    name: String,
    schema_info: String,
    llm_schema: String,
    created_at: DateTime<Utc>,
}

impl From<ContextTableRow> for ContextTable {
    fn from(row: ContextTableRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            schema_info: row.schema_info,
            llm_schema: row.llm_schema,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct NavigationRow {
    id: i64,
    title: String,
    stem: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<NavigationRow> for Navigation {
    fn from(row: NavigationRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            stem: row.stem,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct GeneralQueryRow {
    id: i64,
    sql_text: String,
    query_text: String,
    description: Option<String>,
    csv_file_path: Option<String>,
    chart_type: Option<String>,
    suggested_chart_types: String,
    summary: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<GeneralQueryRow> for GeneralQuery {
    type Error = AppError;

    fn try_from(row: GeneralQueryRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            sql: row.sql_text,
            query_text: row.query_text,
            description: row.description,
            csv_file_path: row.csv_file_path,
            chart_type: parse_chart(row.chart_type.as_deref())?,
            suggested_chart_types: ChartType::parse_list(row.suggested_chart_types.as_str())?,
            summary: row.summary,
            created_at: row.created_at,
        })
    }
}

fn parse_chart(value: Option<&str>) -> AppResult<Option<ChartType>> {
    value.map(str::parse::<ChartType>).transpose()
}
