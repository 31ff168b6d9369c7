use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use insightdeck_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::resource::{ResourceKind, ScopedResource};

/// Supported chart renderings for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Single KPI-style card.
    Kpi,
    /// Bar chart.
    Bar,
    /// Line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Area chart.
    Area,
    /// Scatter plot.
    Scatter,
    /// Plain tabular rendering.
    Table,
}

impl ChartType {
    /// Returns a stable storage value for this chart type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kpi => "kpi",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Area => "area",
            Self::Scatter => "scatter",
            Self::Table => "table",
        }
    }

    /// Parses a comma-separated list, skipping blank items.
    pub fn parse_list(value: &str) -> AppResult<Vec<Self>> {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(Self::from_str)
            .collect()
    }

    /// Joins chart types into the comma-separated storage form.
    #[must_use]
    pub fn join_list(values: &[Self]) -> String {
        values
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for ChartType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kpi" => Ok(Self::Kpi),
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            "pie" => Ok(Self::Pie),
            "area" => Ok(Self::Area),
            "scatter" => Ok(Self::Scatter),
            "table" => Ok(Self::Table),
            _ => Err(AppError::Validation(format!(
                "unknown chart type '{value}'"
            ))),
        }
    }
}

/// Dashboard grouping queries inside an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Stable identifier.
    pub id: i64,
    /// Owning analysis.
    pub analysis_id: i64,
    /// Display title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardDraft {
    analysis_id: i64,
    title: NonEmptyString,
}

impl DashboardDraft {
    /// Creates a validated dashboard draft.
    pub fn new(analysis_id: i64, title: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            analysis_id,
            title: NonEmptyString::new(title.into().trim())?,
        })
    }

    /// Returns the owning analysis.
    #[must_use]
    pub fn analysis_id(&self) -> i64 {
        self.analysis_id
    }

    /// Returns the dashboard title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
}

impl ScopedResource for Dashboard {
    type Draft = DashboardDraft;

    const KIND: ResourceKind = ResourceKind::Dashboard;

    fn id(&self) -> i64 {
        self.id
    }
}
