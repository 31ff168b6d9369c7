use insightdeck_core::AppResult;
use insightdeck_domain::{
    ContextTable, ContextTableDraft, GeneralQuery, GeneralQueryDraft, Navigation, NavigationDraft,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::{chart_names, parse_chart, parse_charts};

/// API representation of a context table.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/context-table-response.ts"
)]
pub struct ContextTableResponse {
    pub id: i64,
    pub name: String,
    pub schema_info: String,
    pub llm_schema: String,
    pub created_at: String,
}

impl From<ContextTable> for ContextTableResponse {
    fn from(value: ContextTable) -> Self {
        Self {
            id: value.id,
            name: value.name,
            schema_info: value.schema_info,
            llm_schema: value.llm_schema,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for context table creation and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-context-table-request.ts"
)]
pub struct SaveContextTableRequest {
    pub name: String,
    pub schema_info: String,
    pub llm_schema: String,
}

impl SaveContextTableRequest {
    pub fn into_draft(self) -> AppResult<ContextTableDraft> {
        ContextTableDraft::new(self.name, self.schema_info, self.llm_schema)
    }
}

/// API representation of a navigation entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/navigation-response.ts"
)]
pub struct NavigationResponse {
    pub id: i64,
    pub title: String,
    pub stem: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Navigation> for NavigationResponse {
    fn from(value: Navigation) -> Self {
        Self {
            id: value.id,
            title: value.title,
            stem: value.stem,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for navigation creation and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-navigation-request.ts"
)]
pub struct SaveNavigationRequest {
    pub title: String,
    pub stem: String,
    pub description: Option<String>,
}

impl SaveNavigationRequest {
    pub fn into_draft(self) -> AppResult<NavigationDraft> {
        NavigationDraft::new(self.title, self.stem, self.description)
    }
}

/// API representation of a curated general query.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/general-query-response.ts"
)]
pub struct GeneralQueryResponse {
    pub id: i64,
    pub sql: String,
    pub query_text: String,
    pub description: Option<String>,
    pub csv_file_path: Option<String>,
    pub chart_type: Option<String>,
    pub suggested_chart_types: Vec<String>,
    pub summary: Option<String>,
    pub created_at: String,
}

impl From<GeneralQuery> for GeneralQueryResponse {
    fn from(value: GeneralQuery) -> Self {
        Self {
            id: value.id,
            sql: value.sql,
            query_text: value.query_text,
            description: value.description,
            csv_file_path: value.csv_file_path,
            chart_type: value.chart_type.map(|chart| chart.as_str().to_owned()),
            suggested_chart_types: chart_names(&value.suggested_chart_types),
            summary: value.summary,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for general query creation and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-general-query-request.ts"
)]
pub struct SaveGeneralQueryRequest {
    pub sql: String,
    pub query_text: String,
    pub description: Option<String>,
    pub csv_file_path: Option<String>,
    pub chart_type: Option<String>,
    #[serde(default)]
    pub suggested_chart_types: Vec<String>,
    pub summary: Option<String>,
}

impl SaveGeneralQueryRequest {
    pub fn into_draft(self) -> AppResult<GeneralQueryDraft> {
        GeneralQueryDraft::new(
            self.sql,
            self.query_text,
            self.description,
            self.csv_file_path,
            parse_chart(self.chart_type.as_deref())?,
            parse_charts(&self.suggested_chart_types)?,
            self.summary,
        )
    }
}
