use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insightdeck_application::{
    CatalogLinkRepository, EntityRepository, MembershipRepository, ResourceAnchorRepository,
    ResourceListQuery, ResourceStore, RowScope, UserRepository,
};
use insightdeck_core::{AppError, AppResult, EntityId, Role, UserId};
use insightdeck_domain::{
    Analysis, AnalysisQuery, ContextTable, Dashboard, Entity, EntityDraft, EntityMembership,
    GeneralQuery, Navigation, PageRequest, QueryResult, ResourceAnchor, ResourceKind,
    ResourceParent, ResourceRef, ScopedResource, UserAccount, UserDraft,
};
use tokio::sync::RwLock;

mod catalog;
mod directory;
mod membership;
mod resources;
mod tenancy;


/// In-memory implementation of every workspace port.
///
/// All tables live behind one lock so cascading deletes are atomic.
#[derive(Debug, Default)]
pub struct InMemoryWorkspaceStore {
    tables: RwLock<WorkspaceTables>,
}

impl InMemoryWorkspaceStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct WorkspaceTables {
    sequences: HashMap<&'static str, i64>,
    entities: BTreeMap<EntityId, Entity>,
    users: BTreeMap<UserId, UserAccount>,
    memberships: Vec<EntityMembership>,
    context_links: BTreeSet<(EntityId, i64)>,
    navigation_links: BTreeSet<(i64, i64)>,
    general_query_links: BTreeSet<(i64, i64)>,
    analyses: BTreeMap<i64, Analysis>,
    dashboards: BTreeMap<i64, Dashboard>,
    queries: BTreeMap<i64, AnalysisQuery>,
    results: BTreeMap<i64, QueryResult>,
    contexts: BTreeMap<i64, ContextTable>,
    navigations: BTreeMap<i64, Navigation>,
    general_queries: BTreeMap<i64, GeneralQuery>,
}

impl WorkspaceTables {
    fn next_id(&mut self, sequence: &'static str) -> i64 {
        let value = self.sequences.entry(sequence).or_insert(0);
        *value += 1;
        *value
    }

    fn entity_ids_of(&self, user_id: UserId) -> BTreeSet<EntityId> {
        self.memberships
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .map(|membership| membership.entity_id)
            .collect()
    }

    fn entity_ids_of_contexts(&self, context_ids: &BTreeSet<i64>) -> BTreeSet<EntityId> {
        self.context_links
            .iter()
            .filter(|(_, context_id)| context_ids.contains(context_id))
            .map(|(entity_id, _)| *entity_id)
            .collect()
    }

    fn owner_of_analysis(&self, analysis_id: i64) -> Option<ResourceAnchor> {
        self.analyses
            .get(&analysis_id)
            .map(|analysis| ResourceAnchor::Owner(analysis.owner_id))
    }

    fn anchor_of_navigation(&self, navigation_id: i64) -> ResourceAnchor {
        let context_ids = self
            .navigation_links
            .iter()
            .filter(|(_, linked_navigation)| *linked_navigation == navigation_id)
            .map(|(context_id, _)| *context_id)
            .collect();
        ResourceAnchor::Entities(self.entity_ids_of_contexts(&context_ids))
    }

    fn anchor_of(&self, resource: ResourceRef) -> Option<ResourceAnchor> {
        match resource.kind {
            ResourceKind::Analysis => self.owner_of_analysis(resource.id),
            ResourceKind::Dashboard => self
                .dashboards
                .get(&resource.id)
                .and_then(|dashboard| self.owner_of_analysis(dashboard.analysis_id)),
            ResourceKind::Query => self
                .queries
                .get(&resource.id)
                .and_then(|query| self.owner_of_analysis(query.analysis_id)),
            ResourceKind::QueryResult => self
                .results
                .get(&resource.id)
                .and_then(|result| self.queries.get(&result.query_id))
                .and_then(|query| self.owner_of_analysis(query.analysis_id)),
            ResourceKind::ContextTable => self.contexts.get(&resource.id).map(|_| {
                ResourceAnchor::Entities(self.entity_ids_of_contexts(&BTreeSet::from([
                    resource.id,
                ])))
            }),
            ResourceKind::Navigation => self
                .navigations
                .get(&resource.id)
                .map(|_| self.anchor_of_navigation(resource.id)),
            ResourceKind::GeneralQuery => self.general_queries.get(&resource.id).map(|_| {
                let mut entity_ids = BTreeSet::new();
                for (navigation_id, _) in self
                    .general_query_links
                    .iter()
                    .filter(|(_, query_id)| *query_id == resource.id)
                {
                    if let ResourceAnchor::Entities(linked) =
                        self.anchor_of_navigation(*navigation_id)
                    {
                        entity_ids.extend(linked);
                    }
                }
                ResourceAnchor::Entities(entity_ids)
            }),
        }
    }

    fn anchor_in_scope(&self, anchor: &ResourceAnchor, scope: &RowScope) -> bool {
        let (owner_filter, entities) = match scope {
            RowScope::Entities(entities) => (None, entities),
            RowScope::OwnedWithin { owner, entities } => (Some(*owner), entities),
            RowScope::ParentOnly => return true,
        };

        match anchor {
            ResourceAnchor::Owner(owner_id) => {
                owner_filter.is_none_or(|owner| owner == *owner_id)
                    && !self.entity_ids_of(*owner_id).is_disjoint(entities)
            }
            ResourceAnchor::Entities(linked) => !linked.is_disjoint(entities),
        }
    }

    fn remove_queries(&mut self, query_ids: &BTreeSet<i64>) {
        self.queries.retain(|id, _| !query_ids.contains(id));
        self.results
            .retain(|_, result| !query_ids.contains(&result.query_id));
    }

    fn remove_analysis(&mut self, analysis_id: i64) {
        self.analyses.remove(&analysis_id);
        self.dashboards
            .retain(|_, dashboard| dashboard.analysis_id != analysis_id);
        let query_ids = self
            .queries
            .values()
            .filter(|query| query.analysis_id == analysis_id)
            .map(|query| query.id)
            .collect();
        self.remove_queries(&query_ids);
    }
}

fn page_slice<T>(rows: Vec<T>, page: Option<PageRequest>) -> Vec<T> {
    match page {
        Some(page) => rows
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size()).unwrap_or(usize::MAX))
            .collect(),
        None => rows,
    }
}

fn count_of<T>(rows: &[T]) -> AppResult<i64> {
    i64::try_from(rows.len())
        .map_err(|error| AppError::Internal(format!("row count overflow: {error}")))
}
