use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use insightdeck_core::{AppError, AppResult, EntityId, UserId};
use serde::{Deserialize, Serialize};

/// Every resource kind subject to entity scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// User-owned analysis workspace.
    Analysis,
    /// Dashboard inside an analysis.
    Dashboard,
    /// Natural-language query inside an analysis.
    Query,
    /// Persisted outcome of a query.
    QueryResult,
    /// Data-source context shared with entities.
    ContextTable,
    /// Navigation entry grouping general queries.
    Navigation,
    /// Predefined query reachable from navigations.
    GeneralQuery,
}

/// How a resource kind reaches the entity partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipStrategy {
    /// Resource chains up to an owning user whose entity memberships decide.
    OwnedByUser,
    /// Resource chains up to context tables linked directly to entities.
    OwnedByContextMembership,
}

impl ResourceKind {
    /// Returns all resource kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceKind] = &[
            ResourceKind::Analysis,
            ResourceKind::Dashboard,
            ResourceKind::Query,
            ResourceKind::QueryResult,
            ResourceKind::ContextTable,
            ResourceKind::Navigation,
            ResourceKind::GeneralQuery,
        ];

        ALL
    }

    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Dashboard => "dashboard",
            Self::Query => "query",
            Self::QueryResult => "query_result",
            Self::ContextTable => "context_table",
            Self::Navigation => "navigation",
            Self::GeneralQuery => "general_query",
        }
    }

    /// Returns the ownership strategy used to scope this kind.
    #[must_use]
    pub fn ownership(&self) -> OwnershipStrategy {
        match self {
            Self::Analysis | Self::Dashboard | Self::Query | Self::QueryResult => {
                OwnershipStrategy::OwnedByUser
            }
            Self::ContextTable | Self::Navigation | Self::GeneralQuery => {
                OwnershipStrategy::OwnedByContextMembership
            }
        }
    }

    /// Returns whether listings of this kind can be narrowed by the given parent.
    #[must_use]
    pub fn supports_parent(&self, parent: &ResourceParent) -> bool {
        matches!(
            (self, parent),
            (Self::Analysis, ResourceParent::Owner(_))
                | (Self::Dashboard, ResourceParent::Analysis(_))
                | (Self::Query, ResourceParent::Analysis(_))
                | (Self::Query, ResourceParent::Dashboard(_))
                | (Self::QueryResult, ResourceParent::Query(_))
                | (Self::Navigation, ResourceParent::Context(_))
                | (Self::GeneralQuery, ResourceParent::Navigation(_))
        )
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource kind '{value}'")))
    }
}

/// Typed pointer to a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Identifier within the kind.
    pub id: i64,
}

impl ResourceRef {
    /// Creates a resource pointer.
    #[must_use]
    pub fn new(kind: ResourceKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl Display for ResourceRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {}", self.kind, self.id)
    }
}

/// Top of a resource's ownership chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAnchor {
    /// Analysis-family resources end at the owning user.
    Owner(UserId),
    /// Context-family resources end at the entities their contexts are linked to.
    Entities(BTreeSet<EntityId>),
}

/// Parent filter for child listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceParent {
    /// Analyses owned by a user.
    Owner(UserId),
    /// Children of an analysis.
    Analysis(i64),
    /// Queries of a dashboard.
    Dashboard(i64),
    /// Navigations linked to a context table.
    Context(i64),
    /// General queries linked to a navigation.
    Navigation(i64),
    /// Results of a query.
    Query(i64),
}

/// What a parent filter points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentTarget {
    /// A user account.
    User(UserId),
    /// Another scoped resource.
    Resource(ResourceRef),
}

impl ResourceParent {
    /// Returns what this parent filter points at.
    #[must_use]
    pub fn target(&self) -> ParentTarget {
        match self {
            Self::Owner(user_id) => ParentTarget::User(*user_id),
            Self::Analysis(id) => {
                ParentTarget::Resource(ResourceRef::new(ResourceKind::Analysis, *id))
            }
            Self::Dashboard(id) => {
                ParentTarget::Resource(ResourceRef::new(ResourceKind::Dashboard, *id))
            }
            Self::Context(id) => {
                ParentTarget::Resource(ResourceRef::new(ResourceKind::ContextTable, *id))
            }
            Self::Navigation(id) => {
                ParentTarget::Resource(ResourceRef::new(ResourceKind::Navigation, *id))
            }
            Self::Query(id) => ParentTarget::Resource(ResourceRef::new(ResourceKind::Query, *id)),
        }
    }
}

/// Record type that participates in entity scoping.
pub trait ScopedResource: Clone + Send + Sync + 'static {
    /// Validated creation input.
    type Draft: Clone + Send + Sync + 'static;

    /// Resource kind of this record type.
    const KIND: ResourceKind;

    /// Returns the record identifier.
    fn id(&self) -> i64;

    /// Returns a pointer to this record.
    fn resource_ref(&self) -> ResourceRef {
        ResourceRef::new(Self::KIND, self.id())
    }
}

/// Default page size for paged listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Creates a validated page request. Both values must be at least one.
    pub fn new(page: i64, size: i64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::Validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if size < 1 {
            return Err(AppError::Validation(format!(
                "size must be at least 1, got {size}"
            )));
        }

        Ok(Self { page, size })
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}
