use insightdeck_core::AppResult;
use insightdeck_domain::{
    Analysis, AnalysisQuery, AnalysisQueryDraft, Dashboard, QueryResult, QueryResultDraft,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::{chart_names, parse_chart, parse_charts};

/// API representation of an analysis.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/analysis-response.ts"
)]
pub struct AnalysisResponse {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub created_at: String,
}

impl From<Analysis> for AnalysisResponse {
    fn from(value: Analysis) -> Self {
        Self {
            id: value.id,
            owner_id: value.owner_id.as_i64(),
            title: value.title,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload carrying a title, used to create or rename analyses and
/// dashboards.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/title-request.ts"
)]
pub struct TitleRequest {
    pub title: String,
}

/// API representation of a dashboard.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/dashboard-response.ts"
)]
pub struct DashboardResponse {
    pub id: i64,
    pub analysis_id: i64,
    pub title: String,
    pub created_at: String,
}

impl From<Dashboard> for DashboardResponse {
    fn from(value: Dashboard) -> Self {
        Self {
            id: value.id,
            analysis_id: value.analysis_id,
            title: value.title,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// API representation of a natural-language query.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/query-response.ts"
)]
pub struct QueryResponse {
    pub id: i64,
    pub analysis_id: i64,
    pub dashboard_id: i64,
    pub context_id: i64,
    pub query_text: String,
    pub created_at: String,
}

impl From<AnalysisQuery> for QueryResponse {
    fn from(value: AnalysisQuery) -> Self {
        Self {
            id: value.id,
            analysis_id: value.analysis_id,
            dashboard_id: value.dashboard_id,
            context_id: value.context_id,
            query_text: value.query_text,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for query creation inside an analysis.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-query-request.ts"
)]
pub struct CreateQueryRequest {
    pub dashboard_id: i64,
    pub context_id: i64,
    pub query_text: String,
}

impl CreateQueryRequest {
    pub fn into_draft(self, analysis_id: i64) -> AppResult<AnalysisQueryDraft> {
        AnalysisQueryDraft::new(
            analysis_id,
            self.dashboard_id,
            self.context_id,
            self.query_text,
        )
    }
}

/// API representation of a stored query result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/query-result-response.ts"
)]
pub struct QueryResultResponse {
    pub id: i64,
    pub query_id: i64,
    pub csv_file_name: String,
    pub chart_type: Option<String>,
    pub summary: Option<String>,
    pub suggested_charts: Vec<String>,
    pub created_at: String,
}

impl From<QueryResult> for QueryResultResponse {
    fn from(value: QueryResult) -> Self {
        Self {
            id: value.id,
            query_id: value.query_id,
            csv_file_name: value.csv_file_name,
            chart_type: value.chart_type.map(|chart| chart.as_str().to_owned()),
            summary: value.summary,
            suggested_charts: chart_names(&value.suggested_charts),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload recording the result of a query run.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-query-result-request.ts"
)]
pub struct CreateQueryResultRequest {
    pub csv_file_name: String,
    pub chart_type: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub suggested_charts: Vec<String>,
}

impl CreateQueryResultRequest {
    pub fn into_draft(self, query_id: i64) -> AppResult<QueryResultDraft> {
        QueryResultDraft::new(
            query_id,
            self.csv_file_name,
            parse_chart(self.chart_type.as_deref())?,
            self.summary,
            parse_charts(&self.suggested_charts)?,
        )
    }
}
