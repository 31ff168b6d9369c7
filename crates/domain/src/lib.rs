//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod analysis;
mod catalog;
mod dashboard;
mod resource;
mod selection;
mod tenant;
mod user;

pub use analysis::{
    Analysis, AnalysisDraft, AnalysisQuery, AnalysisQueryDraft, QueryResult, QueryResultDraft,
};
pub use catalog::{
    ContextTable, ContextTableDraft, GeneralQuery, GeneralQueryDraft, Navigation, NavigationDraft,
};
pub use dashboard::{ChartType, Dashboard, DashboardDraft};
pub use resource::{
    DEFAULT_PAGE_SIZE, OwnershipStrategy, PageRequest, ParentTarget, ResourceAnchor, ResourceKind,
    ResourceParent, ResourceRef, ScopedResource,
};
pub use selection::{ALL_ENTITIES_WIRE_VALUE, TenantSelection};
pub use tenant::{Entity, EntityDraft, EntityMembership, primary_membership};
pub use user::{EmailAddress, UserAccount, UserDraft};

/// Trims optional free text and drops it when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
