//! PostgreSQL-backed workspace store.
//!
//! Cascades and the context-table delete guard live in the schema; this
//! adapter maps constraint violations onto application errors.

use std::collections::BTreeSet;

use async_trait::async_trait;
use insightdeck_application::{
    CatalogLinkRepository, EntityRepository, MembershipRepository, ResourceAnchorRepository,
    ResourceListQuery, ResourceStore, RowScope, UserRepository,
};
use insightdeck_core::{AppError, AppResult, EntityId, UserId};
use insightdeck_domain::{
    Entity, EntityDraft, EntityMembership, PageRequest, ResourceAnchor, ResourceKind,
    ResourceParent, ResourceRef, ScopedResource, UserAccount, UserDraft,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::warn;

mod catalog;
mod directory;
mod membership;
mod resources;
mod rows;
mod tenancy;

#[cfg(test)]
mod tests;

use rows::{EntityRow, MembershipRow, USER_COLUMNS, UserRow};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL implementation of every workspace port.
#[derive(Clone)]
pub struct PostgresWorkspaceStore {
    pool: PgPool,
}

impl PostgresWorkspaceStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// How rows of one table reach the tenancy graph.
#[derive(Debug, Clone, Copy)]
enum AnchorSql {
    /// Expression yielding the owning user id of row `r`.
    Owner(&'static str),
    /// `FROM ... WHERE ...` fragment exposing `ecm.entity_id` for row `r`.
    Entities(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct TableLayout {
    table: &'static str,
    anchor: AnchorSql,
}

const ANALYSIS_OWNER: &str = "(SELECT a.owner_id FROM analyses a WHERE a.id = r.analysis_id)";
const NAVIGATION_ENTITIES: &str = r#"
    FROM context_navigation_links cnl
    JOIN entity_context_memberships ecm ON ecm.context_id = cnl.context_id
    WHERE cnl.navigation_id = r.id
"#;

fn layout(kind: ResourceKind) -> TableLayout {
    match kind {
        ResourceKind::Analysis => TableLayout {
            table: "analyses",
            anchor: AnchorSql::Owner("r.owner_id"),
        },
        ResourceKind::Dashboard => TableLayout {
            table: "dashboards",
            anchor: AnchorSql::Owner(ANALYSIS_OWNER),
        },
        ResourceKind::Query => TableLayout {
            table: "analysis_queries",
            anchor: AnchorSql::Owner(ANALYSIS_OWNER),
        },
        ResourceKind::QueryResult => TableLayout {
            table: "query_results",
            anchor: AnchorSql::Owner(
                r#"(
                    SELECT a.owner_id
                    FROM analysis_queries q
                    JOIN analyses a ON a.id = q.analysis_id
                    WHERE q.id = r.query_id
                )"#,
            ),
        },
        ResourceKind::ContextTable => TableLayout {
            table: "context_tables",
            anchor: AnchorSql::Entities(
                "FROM entity_context_memberships ecm WHERE ecm.context_id = r.id",
            ),
        },
        ResourceKind::Navigation => TableLayout {
            table: "navigations",
            anchor: AnchorSql::Entities(NAVIGATION_ENTITIES),
        },
        ResourceKind::GeneralQuery => TableLayout {
            table: "general_queries",
            anchor: AnchorSql::Entities(
                r#"
                FROM navigation_general_query_links ngl
                JOIN context_navigation_links cnl ON cnl.navigation_id = ngl.navigation_id
                JOIN entity_context_memberships ecm ON ecm.context_id = cnl.context_id
                WHERE ngl.general_query_id = r.id
                "#,
            ),
        },
    }
}

fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, anchor: AnchorSql, scope: &RowScope) {
    let (owner, entities) = match scope {
        RowScope::Entities(entities) => (None, entities),
        RowScope::OwnedWithin { owner, entities } => (Some(*owner), entities),
        RowScope::ParentOnly => return,
    };
    let entity_ids = entity_id_values(entities);

    match anchor {
        AnchorSql::Owner(owner_sql) => {
            builder.push(format!(
                " AND EXISTS (SELECT 1 FROM entity_user_memberships m \
                 WHERE m.user_id = {owner_sql} AND m.entity_id = ANY("
            ));
            builder.push_bind(entity_ids);
            builder.push("))");

            if let Some(owner) = owner {
                builder.push(format!(" AND {owner_sql} = "));
                builder.push_bind(owner.as_i64());
            }
        }
        AnchorSql::Entities(fragment) => {
            builder.push(format!(
                " AND EXISTS (SELECT 1 {fragment} AND ecm.entity_id = ANY("
            ));
            builder.push_bind(entity_ids);
            builder.push("))");
        }
    }
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: Option<PageRequest>) {
    if let Some(page) = page {
        builder.push(" LIMIT ");
        builder.push_bind(page.size());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());
    }
}

fn database_code(error: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().map(|code| code.into_owned());
    }

    None
}

/// Maps an insert or update failure, treating constraint violations as caller errors.
fn write_error(error: sqlx::Error, subject: &str) -> AppError {
    match database_code(&error).as_deref() {
        Some(UNIQUE_VIOLATION) => AppError::Conflict(format!("{subject} already exists")),
        Some(FOREIGN_KEY_VIOLATION) => {
            AppError::NotFound(format!("a record referenced by {subject} does not exist"))
        }
        _ => AppError::Internal(format!("failed to write {subject}: {error}")),
    }
}

/// Maps a delete failure, treating restricted references as conflicts.
fn delete_error(error: sqlx::Error, subject: &str) -> AppError {
    if database_code(&error).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        warn!(subject, "delete blocked by referencing rows");
        return AppError::Conflict(format!("{subject} is still referenced"));
    }

    AppError::Internal(format!("failed to delete {subject}: {error}"))
}

fn read_error(error: sqlx::Error, subject: &str) -> AppError {
    AppError::Internal(format!("failed to load {subject}: {error}"))
}

fn entity_id_values(entity_ids: &BTreeSet<EntityId>) -> Vec<i64> {
    entity_ids.iter().map(|entity_id| entity_id.as_i64()).collect()
}
