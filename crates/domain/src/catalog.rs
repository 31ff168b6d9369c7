//! Context-family records shared with entities through context links.

use chrono::{DateTime, Utc};
use insightdeck_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::dashboard::ChartType;
use crate::optional_text;
use crate::resource::{ResourceKind, ScopedResource};

/// Data-source context describing a queryable schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTable {
    /// Stable identifier.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// Human-readable schema description.
    pub schema_info: String,
    /// Schema description handed to the query generator.
    pub llm_schema: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or updating a context table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTableDraft {
    name: NonEmptyString,
    schema_info: NonEmptyString,
    llm_schema: NonEmptyString,
}

impl ContextTableDraft {
    /// Creates a validated context table draft.
    pub fn new(
        name: impl Into<String>,
        schema_info: impl Into<String>,
        llm_schema: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name.into().trim())?,
            schema_info: NonEmptyString::new(schema_info)?,
            llm_schema: NonEmptyString::new(llm_schema)?,
        })
    }

    /// Returns the context name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the schema description.
    #[must_use]
    pub fn schema_info(&self) -> &str {
        self.schema_info.as_str()
    }

    /// Returns the generator schema description.
    #[must_use]
    pub fn llm_schema(&self) -> &str {
        self.llm_schema.as_str()
    }
}

impl ScopedResource for ContextTable {
    type Draft = ContextTableDraft;

    const KIND: ResourceKind = ResourceKind::ContextTable;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Navigation entry grouping general queries for a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Stable identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Unique URL stem.
    pub stem: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or updating a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDraft {
    title: NonEmptyString,
    stem: NonEmptyString,
    description: Option<String>,
}

impl NavigationDraft {
    /// Creates a validated navigation draft.
    ///
    /// The stem is trimmed and must not contain whitespace.
    pub fn new(
        title: impl Into<String>,
        stem: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let stem = stem.into().trim().to_owned();
        if stem.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "navigation stem '{stem}' must not contain whitespace"
            )));
        }

        Ok(Self {
            title: NonEmptyString::new(title.into().trim())?,
            stem: NonEmptyString::new(stem)?,
            description: optional_text(description),
        })
    }

    /// Returns the navigation title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the navigation stem.
    #[must_use]
    pub fn stem(&self) -> &str {
        self.stem.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl ScopedResource for Navigation {
    type Draft = NavigationDraft;

    const KIND: ResourceKind = ResourceKind::Navigation;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Predefined query reachable from one or more navigations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralQuery {
    /// Stable identifier.
    pub id: i64,
    /// Stored SQL text.
    pub sql: String,
    /// Question the SQL answers.
    pub query_text: String,
    /// Optional description.
    pub description: Option<String>,
    /// Location of the cached result file.
    pub csv_file_path: Option<String>,
    /// Preferred chart rendering.
    pub chart_type: Option<ChartType>,
    /// Alternative chart renderings.
    pub suggested_chart_types: Vec<ChartType>,
    /// Narrative summary.
    pub summary: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating or updating a general query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralQueryDraft {
    sql: NonEmptyString,
    query_text: NonEmptyString,
    description: Option<String>,
    csv_file_path: Option<String>,
    chart_type: Option<ChartType>,
    suggested_chart_types: Vec<ChartType>,
    summary: Option<String>,
}

impl GeneralQueryDraft {
    /// Creates a validated general query draft.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sql: impl Into<String>,
        query_text: impl Into<String>,
        description: Option<String>,
        csv_file_path: Option<String>,
        chart_type: Option<ChartType>,
        suggested_chart_types: Vec<ChartType>,
        summary: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            sql: NonEmptyString::new(sql)?,
            query_text: NonEmptyString::new(query_text.into().trim())?,
            description: optional_text(description),
            csv_file_path: optional_text(csv_file_path),
            chart_type,
            suggested_chart_types,
            summary: optional_text(summary),
        })
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }

    /// Returns the question text.
    #[must_use]
    pub fn query_text(&self) -> &str {
        self.query_text.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional cached result path.
    #[must_use]
    pub fn csv_file_path(&self) -> Option<&str> {
        self.csv_file_path.as_deref()
    }

    /// Returns the preferred chart type.
    #[must_use]
    pub fn chart_type(&self) -> Option<ChartType> {
        self.chart_type
    }

    /// Returns suggested chart types.
    #[must_use]
    pub fn suggested_chart_types(&self) -> &[ChartType] {
        &self.suggested_chart_types
    }

    /// Returns the optional summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl ScopedResource for GeneralQuery {
    type Draft = GeneralQueryDraft;

    const KIND: ResourceKind = ResourceKind::GeneralQuery;

    fn id(&self) -> i64 {
        self.id
    }
}
