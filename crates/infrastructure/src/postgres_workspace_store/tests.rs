use std::collections::BTreeSet;

use insightdeck_application::{
    CatalogLinkRepository, EntityRepository, MembershipRepository, ResourceAnchorRepository,
    ResourceListQuery, ResourceStore, RowScope, UserRepository,
};
use insightdeck_core::{AppError, EntityId, UserId};
use insightdeck_domain::{
    Analysis, AnalysisDraft, AnalysisQuery, AnalysisQueryDraft, ContextTable, ContextTableDraft,
    Dashboard, DashboardDraft, EntityDraft, GeneralQuery, GeneralQueryDraft, Navigation,
    NavigationDraft, ResourceAnchor, ResourceKind, ResourceParent, ResourceRef, UserDraft,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresWorkspaceStore;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres workspace tests: {error}");
    }

    Some(pool)
}

fn unique(label: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{label}-{nanos}")
}

async fn create_user(store: &PostgresWorkspaceStore, role: &str) -> UserId {
    let email = format!("{}@example.com", unique("user"));
    let draft = UserDraft::new("Test User", email, role).unwrap_or_else(|_| unreachable!());
    store
        .create_user(draft, None)
        .await
        .map(|user| user.id)
        .unwrap_or_else(|_| unreachable!())
}

async fn create_entity(store: &PostgresWorkspaceStore) -> EntityId {
    let draft = EntityDraft::new(unique("entity"), None).unwrap_or_else(|_| unreachable!());
    store
        .create_entity(draft)
        .await
        .map(|entity| entity.id)
        .unwrap_or_else(|_| unreachable!())
}

async fn create_context(store: &PostgresWorkspaceStore) -> ContextTable {
    let draft = ContextTableDraft::new(unique("context"), "t(id)", "t(id int)")
        .unwrap_or_else(|_| unreachable!());
    ResourceStore::<ContextTable>::insert(store, draft)
        .await
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn owned_rows_are_filtered_by_owner_membership() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let entity_id = create_entity(&store).await;
    let member = create_user(&store, "USER").await;
    let outsider = create_user(&store, "USER").await;
    assert!(store.add_membership(entity_id, member).await.is_ok());

    for owner in [member, member, outsider] {
        let draft = AnalysisDraft::new(owner, "Quarterly").unwrap_or_else(|_| unreachable!());
        assert!(ResourceStore::<Analysis>::insert(&store, draft).await.is_ok());
    }

    let scoped = ResourceListQuery {
        scope: RowScope::Entities(BTreeSet::from([entity_id])),
        parent: None,
        page: None,
    };
    let analyses = ResourceStore::<Analysis>::list(&store, &scoped)
        .await
        .unwrap_or_default();
    assert_eq!(analyses.len(), 2);
    assert!(analyses.iter().all(|analysis| analysis.owner_id == member));
    assert_eq!(
        ResourceStore::<Analysis>::count(&store, &scoped).await.ok(),
        Some(2)
    );

    let owned_by_outsider = ResourceListQuery {
        scope: RowScope::OwnedWithin {
            owner: outsider,
            entities: BTreeSet::from([entity_id]),
        },
        parent: None,
        page: None,
    };
    assert_eq!(
        ResourceStore::<Analysis>::count(&store, &owned_by_outsider).await.ok(),
        Some(0)
    );
}

#[tokio::test]
async fn membership_insert_is_idempotent() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let entity_id = create_entity(&store).await;
    let user_id = create_user(&store, "ADMIN").await;

    let first = store.add_membership(entity_id, user_id).await;
    let second = store.add_membership(entity_id, user_id).await;
    assert!(first.is_ok());
    assert_eq!(first.ok(), second.ok());

    let memberships = store
        .list_memberships_for_user(user_id)
        .await
        .unwrap_or_default();
    assert_eq!(memberships.len(), 1);

    assert!(matches!(
        store.add_membership(entity_id, UserId::from_i64(i64::MAX)).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn failed_home_membership_rolls_back_the_user() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let email = format!("{}@example.com", unique("homeless"));
    let draft = UserDraft::new("Test User", email.as_str(), "USER")
        .unwrap_or_else(|_| unreachable!());
    assert!(matches!(
        store
            .create_user(draft.clone(), Some(EntityId::from_i64(i64::MAX)))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(
        store
            .find_user_by_email(email.as_str())
            .await
            .unwrap_or_default()
            .is_none()
    );

    let home = create_entity(&store).await;
    let created = store
        .create_user(draft, Some(home))
        .await
        .unwrap_or_else(|_| unreachable!());
    let memberships = store
        .list_memberships_for_user(created.id)
        .await
        .unwrap_or_default();
    assert_eq!(
        memberships
            .iter()
            .map(|membership| membership.entity_id)
            .collect::<Vec<_>>(),
        vec![home]
    );
}

#[tokio::test]
async fn context_referenced_by_query_cannot_be_deleted() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let owner = create_user(&store, "USER").await;
    let context = create_context(&store).await;
    let analysis = ResourceStore::<Analysis>::insert(
        &store,
        AnalysisDraft::new(owner, "Churn").unwrap_or_else(|_| unreachable!()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    let dashboard = ResourceStore::<Dashboard>::insert(
        &store,
        DashboardDraft::new(analysis.id, "Board").unwrap_or_else(|_| unreachable!()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    let query = ResourceStore::<AnalysisQuery>::insert(
        &store,
        AnalysisQueryDraft::new(analysis.id, dashboard.id, context.id, "Why?")
            .unwrap_or_else(|_| unreachable!()),
    )
    .await;
    assert!(query.is_ok());

    assert!(matches!(
        ResourceStore::<ContextTable>::delete(&store, context.id).await,
        Err(AppError::Conflict(_))
    ));

    assert_eq!(
        ResourceStore::<Analysis>::delete(&store, analysis.id).await.ok(),
        Some(true)
    );
    assert_eq!(
        ResourceStore::<ContextTable>::delete(&store, context.id).await.ok(),
        Some(true)
    );
}

#[tokio::test]
async fn general_query_anchor_follows_catalog_links() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let entity_id = create_entity(&store).await;
    let context = create_context(&store).await;
    assert!(store.link_context(entity_id, context.id).await.is_ok());

    let navigation = ResourceStore::<Navigation>::insert(
        &store,
        NavigationDraft::new("Sales", unique("sales"), None).unwrap_or_else(|_| unreachable!()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());
    let general_query = ResourceStore::<GeneralQuery>::insert(
        &store,
        GeneralQueryDraft::new("select 1", "Top", None, None, None, vec![], None)
            .unwrap_or_else(|_| unreachable!()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let reference = ResourceRef::new(ResourceKind::GeneralQuery, general_query.id);
    assert_eq!(
        store.resolve_anchor(reference).await.ok(),
        Some(Some(ResourceAnchor::Entities(BTreeSet::new())))
    );

    assert!(store.link_navigation(context.id, navigation.id).await.is_ok());
    assert!(
        store
            .link_general_query(navigation.id, general_query.id)
            .await
            .is_ok()
    );
    assert_eq!(
        store.resolve_anchor(reference).await.ok(),
        Some(Some(ResourceAnchor::Entities(BTreeSet::from([entity_id]))))
    );

    let children = ResourceListQuery {
        scope: RowScope::Entities(BTreeSet::from([entity_id])),
        parent: Some(ResourceParent::Navigation(navigation.id)),
        page: None,
    };
    assert_eq!(
        ResourceStore::<GeneralQuery>::count(&store, &children).await.ok(),
        Some(1)
    );

    let missing = ResourceRef::new(ResourceKind::GeneralQuery, i64::MAX);
    assert_eq!(store.resolve_anchor(missing).await.ok(), Some(None));
}

#[tokio::test]
async fn duplicate_navigation_stem_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let draft =
        NavigationDraft::new("Ops", unique("ops"), None).unwrap_or_else(|_| unreachable!());

    assert!(ResourceStore::<Navigation>::insert(&store, draft.clone()).await.is_ok());
    assert!(matches!(
        ResourceStore::<Navigation>::insert(&store, draft).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn deleting_user_removes_owned_analyses() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let store = PostgresWorkspaceStore::new(pool);
    let owner = create_user(&store, "USER").await;
    let analysis = ResourceStore::<Analysis>::insert(
        &store,
        AnalysisDraft::new(owner, "Retention").unwrap_or_else(|_| unreachable!()),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(store.delete_user(owner).await.ok(), Some(true));
    assert!(store.find_user(owner).await.unwrap_or_default().is_none());
    assert!(
        ResourceStore::<Analysis>::find_by_id(&store, analysis.id)
            .await
            .unwrap_or_default()
            .is_none()
    );
}
