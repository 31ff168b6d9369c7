use chrono::{DateTime, Utc};
use insightdeck_core::{AppResult, NonEmptyString, UserId};
use serde::{Deserialize, Serialize};

use crate::dashboard::ChartType;
use crate::optional_text;
use crate::resource::{ResourceKind, ScopedResource};

/// User-owned analysis workspace, root of the analysis ownership chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Stable identifier.
    pub id: i64,
    /// Owning user.
    pub owner_id: UserId,
    /// Display title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDraft {
    owner_id: UserId,
    title: NonEmptyString,
}

impl AnalysisDraft {
    /// Creates a validated analysis draft.
    pub fn new(owner_id: UserId, title: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            owner_id,
            title: NonEmptyString::new(title.into().trim())?,
        })
    }

    /// Returns the owning user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the analysis title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
}

impl ScopedResource for Analysis {
    type Draft = AnalysisDraft;

    const KIND: ResourceKind = ResourceKind::Analysis;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Natural-language query asked inside an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisQuery {
    /// Stable identifier.
    pub id: i64,
    /// Owning analysis.
    pub analysis_id: i64,
    /// Dashboard the query is pinned to.
    pub dashboard_id: i64,
    /// Context table the query runs against.
    pub context_id: i64,
    /// Question text.
    pub query_text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating an analysis query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisQueryDraft {
    analysis_id: i64,
    dashboard_id: i64,
    context_id: i64,
    query_text: NonEmptyString,
}

impl AnalysisQueryDraft {
    /// Creates a validated query draft.
    pub fn new(
        analysis_id: i64,
        dashboard_id: i64,
        context_id: i64,
        query_text: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            analysis_id,
            dashboard_id,
            context_id,
            query_text: NonEmptyString::new(query_text.into().trim())?,
        })
    }

    /// Returns the owning analysis.
    #[must_use]
    pub fn analysis_id(&self) -> i64 {
        self.analysis_id
    }

    /// Returns the target dashboard.
    #[must_use]
    pub fn dashboard_id(&self) -> i64 {
        self.dashboard_id
    }

    /// Returns the context table.
    #[must_use]
    pub fn context_id(&self) -> i64 {
        self.context_id
    }

    /// Returns the question text.
    #[must_use]
    pub fn query_text(&self) -> &str {
        self.query_text.as_str()
    }
}

impl ScopedResource for AnalysisQuery {
    type Draft = AnalysisQueryDraft;

    const KIND: ResourceKind = ResourceKind::Query;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Persisted outcome of running a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Stable identifier.
    pub id: i64,
    /// Query that produced the result.
    pub query_id: i64,
    /// Name of the exported result file.
    pub csv_file_name: String,
    /// Chart chosen for rendering.
    pub chart_type: Option<ChartType>,
    /// Narrative summary.
    pub summary: Option<String>,
    /// Alternative chart renderings.
    pub suggested_charts: Vec<ChartType>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for recording a query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResultDraft {
    query_id: i64,
    csv_file_name: NonEmptyString,
    chart_type: Option<ChartType>,
    summary: Option<String>,
    suggested_charts: Vec<ChartType>,
}

impl QueryResultDraft {
    /// Creates a validated query result draft.
    pub fn new(
        query_id: i64,
        csv_file_name: impl Into<String>,
        chart_type: Option<ChartType>,
        summary: Option<String>,
        suggested_charts: Vec<ChartType>,
    ) -> AppResult<Self> {
        let mut unique_charts = Vec::with_capacity(suggested_charts.len());
        for chart in suggested_charts {
            if !unique_charts.contains(&chart) {
                unique_charts.push(chart);
            }
        }

        Ok(Self {
            query_id,
            csv_file_name: NonEmptyString::new(csv_file_name.into().trim())?,
            chart_type,
            summary: optional_text(summary),
            suggested_charts: unique_charts,
        })
    }

    /// Returns the producing query.
    #[must_use]
    pub fn query_id(&self) -> i64 {
        self.query_id
    }

    /// Returns the result file name.
    #[must_use]
    pub fn csv_file_name(&self) -> &str {
        self.csv_file_name.as_str()
    }

    /// Returns the chosen chart type.
    #[must_use]
    pub fn chart_type(&self) -> Option<ChartType> {
        self.chart_type
    }

    /// Returns the summary text.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns suggested chart types without duplicates.
    #[must_use]
    pub fn suggested_charts(&self) -> &[ChartType] {
        &self.suggested_charts
    }
}

impl ScopedResource for QueryResult {
    type Draft = QueryResultDraft;

    const KIND: ResourceKind = ResourceKind::QueryResult;

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use insightdeck_core::UserId;

    use super::{AnalysisDraft, AnalysisQueryDraft, QueryResultDraft};
    use crate::ChartType;

    #[test]
    fn analysis_draft_trims_title() {
        let draft = AnalysisDraft::new(UserId::from_i64(1), "  Churn  ");
        assert_eq!(draft.ok().map(|value| value.title().to_owned()).as_deref(), Some("Churn"));
    }

    #[test]
    fn query_draft_requires_question_text() {
        assert!(AnalysisQueryDraft::new(1, 1, 1, "").is_err());
    }

    #[test]
    fn query_result_draft_deduplicates_suggestions() {
        let draft = QueryResultDraft::new(
            1,
            "result.csv",
            Some(ChartType::Bar),
            Some("  ".to_owned()),
            vec![ChartType::Line, ChartType::Bar, ChartType::Line],
        )
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(draft.suggested_charts(), &[ChartType::Line, ChartType::Bar]);
        assert_eq!(draft.summary(), None);
    }
}
