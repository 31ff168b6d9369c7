use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use insightdeck_core::{AppError, Principal};
use insightdeck_domain::Analysis;

use super::{catalog, directory, health, resources, tenancy, workspace};
use crate::api_router::build_router;
use crate::api_services::build_memory_session_layer;
use crate::dto::{
    CreateQueryRequest, CreateUserRequest, ListQuery, SaveContextTableRequest, ScopeQuery,
    TitleRequest,
};
use crate::error::ApiError;
use crate::test_support::TestApp;

async fn create_analysis(app: &TestApp, owner: Principal, title: &str) -> i64 {
    workspace::create_analysis_handler(
        State(app.state.clone()),
        Extension(owner),
        Json(TitleRequest {
            title: title.to_owned(),
        }),
    )
    .await
    .map(|(_, Json(analysis))| analysis.id)
    .unwrap_or_else(|_| unreachable!())
}

fn scope(entity_id: Option<i64>) -> Query<ScopeQuery> {
    Query(ScopeQuery { entity_id })
}

#[tokio::test]
async fn health_reports_ok() {
    let Json(response) = health::health_handler().await;
    assert_eq!(response.status, "ok");
}

#[test]
fn router_registers_every_route() {
    let app = TestApp::new();
    let router = build_router(
        app.state,
        "http://localhost:3000",
        build_memory_session_layer(false),
    );
    assert!(router.is_ok());
}

#[tokio::test]
async fn user_lists_only_their_own_analyses() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "USER").await;
    let bob = app.user("bob@example.com", "USER").await;
    app.entity("Acme", &[alice, bob]).await;

    create_analysis(&app, alice, "Churn").await;
    create_analysis(&app, alice, "Revenue").await;
    create_analysis(&app, bob, "Hiring").await;

    let listed = resources::list_handler::<Analysis>(
        State(app.state.clone()),
        Extension(alice),
        Query(ListQuery {
            size: Some(1),
            ..ListQuery::default()
        }),
    )
    .await
    .map(|Json(analyses)| analyses)
    .unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].owner_id, alice.user_id().as_i64());

    let count = resources::count_handler::<Analysis>(
        State(app.state.clone()),
        Extension(alice),
        scope(None),
    )
    .await
    .map(|Json(count)| count.count)
    .unwrap_or_default();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn super_admin_override_narrows_listing() {
    let app = TestApp::new();
    let root = app.user("root@example.com", "SUPERADMIN").await;
    let first = app.user("first@example.com", "USER").await;
    let second = app.user("second@example.com", "USER").await;
    let first_entity = app.entity("First", &[first]).await;
    app.entity("Second", &[second]).await;

    create_analysis(&app, first, "One").await;
    create_analysis(&app, second, "Two").await;

    let everything = resources::list_all_handler::<Analysis>(
        State(app.state.clone()),
        Extension(root),
        scope(None),
    )
    .await
    .map(|Json(analyses)| analyses.len())
    .unwrap_or_default();
    assert_eq!(everything, 2);

    let narrowed = resources::list_all_handler::<Analysis>(
        State(app.state.clone()),
        Extension(root),
        scope(Some(first_entity.as_i64())),
    )
    .await
    .map(|Json(analyses)| analyses)
    .unwrap_or_default();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].owner_id, first.user_id().as_i64());

    let unknown = resources::list_all_handler::<Analysis>(
        State(app.state.clone()),
        Extension(root),
        scope(Some(9_999)),
    )
    .await
    .map(|Json(analyses)| analyses.len());
    assert_eq!(unknown.ok(), Some(0));
}

#[tokio::test]
async fn negative_override_is_rejected_for_super_admins_only() {
    let app = TestApp::new();
    let root = app.user("root@example.com", "SUPERADMIN").await;
    let alice = app.user("alice@example.com", "USER").await;
    create_analysis(&app, alice, "Churn").await;

    let ignored = resources::count_handler::<Analysis>(
        State(app.state.clone()),
        Extension(alice),
        scope(Some(-3)),
    )
    .await
    .map(|Json(count)| count.count);
    assert_eq!(ignored.ok(), Some(1));

    let result = resources::count_handler::<Analysis>(
        State(app.state.clone()),
        Extension(root),
        scope(Some(-3)),
    )
    .await;
    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn get_reports_missing_before_forbidden() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com", "USER").await;
    let mallory = app.user("mallory@example.com", "USER").await;
    app.entity("Acme", &[alice]).await;
    app.entity("Other", &[mallory]).await;
    let analysis_id = create_analysis(&app, alice, "Private").await;

    let foreign = resources::get_handler::<Analysis>(
        State(app.state.clone()),
        Extension(mallory),
        Path(analysis_id),
        scope(None),
    )
    .await;
    assert!(matches!(foreign, Err(ApiError(AppError::Forbidden(_)))));

    let missing = resources::get_handler::<Analysis>(
        State(app.state.clone()),
        Extension(mallory),
        Path(analysis_id + 100),
        scope(None),
    )
    .await;
    assert!(matches!(missing, Err(ApiError(AppError::NotFound(_)))));

    let deleted = resources::delete_handler::<Analysis>(
        State(app.state.clone()),
        Extension(alice),
        Path(analysis_id),
        scope(None),
    )
    .await;
    assert_eq!(deleted.ok(), Some(StatusCode::NO_CONTENT));
}

#[tokio::test]
async fn only_super_admin_selects_entities() {
    let app = TestApp::new();
    let root = app.user("root@example.com", "SUPERADMIN").await;
    let admin = app.user("admin@example.com", "ADMIN").await;
    let entity_id = app.entity("Acme", &[admin]).await;

    let selected = tenancy::select_entity_handler(
        State(app.state.clone()),
        Extension(root),
        Path(entity_id.as_i64()),
    )
    .await
    .map(|Json(selection)| (selection.mode, selection.entity_id));
    assert_eq!(
        selected.ok(),
        Some(("entity".to_owned(), entity_id.as_i64()))
    );

    let all = tenancy::select_entity_handler(State(app.state.clone()), Extension(root), Path(0))
        .await
        .map(|Json(selection)| selection.mode);
    assert_eq!(all.ok().as_deref(), Some("all_entities"));

    let denied = tenancy::select_entity_handler(
        State(app.state.clone()),
        Extension(admin),
        Path(entity_id.as_i64()),
    )
    .await;
    assert!(matches!(denied, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn admin_creates_users_in_their_entity() {
    let app = TestApp::new();
    let admin = app.user("admin@example.com", "ADMIN").await;
    let entity_id = app.entity("Acme", &[admin]).await;

    let request = || CreateUserRequest {
        name: "Dana".to_owned(),
        email: "dana@example.com".to_owned(),
        role: "user".to_owned(),
    };

    let created = directory::create_user_handler(
        State(app.state.clone()),
        Extension(admin),
        Json(request()),
    )
    .await
    .map(|(status, Json(user))| (status, user));
    let Ok((status, user)) = created else {
        unreachable!()
    };
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user.role, "USER");

    let entities = tenancy::user_entities_handler(
        State(app.state.clone()),
        Extension(admin),
        Path(user.id),
    )
    .await
    .map(|Json(entities)| entities.into_iter().map(|entity| entity.id).collect::<Vec<_>>())
    .unwrap_or_default();
    assert_eq!(entities, vec![entity_id.as_i64()]);

    let duplicate = directory::create_user_handler(
        State(app.state.clone()),
        Extension(admin),
        Json(request()),
    )
    .await;
    assert!(matches!(duplicate, Err(ApiError(AppError::Conflict(_)))));

    let super_admin = directory::create_user_handler(
        State(app.state.clone()),
        Extension(admin),
        Json(CreateUserRequest {
            role: "SUPERADMIN".to_owned(),
            email: "boss@example.com".to_owned(),
            ..request()
        }),
    )
    .await;
    assert!(matches!(super_admin, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn query_must_use_a_dashboard_of_its_analysis() {
    let app = TestApp::new();
    let admin = app.user("admin@example.com", "ADMIN").await;
    let alice = app.user("alice@example.com", "USER").await;
    app.entity("Acme", &[admin, alice]).await;

    let context_request = || SaveContextTableRequest {
        name: "loans".to_owned(),
        schema_info: "loans(id int)".to_owned(),
        llm_schema: "loans: id".to_owned(),
    };
    let denied = catalog::create_context_handler(
        State(app.state.clone()),
        Extension(alice),
        Json(context_request()),
    )
    .await;
    assert!(matches!(denied, Err(ApiError(AppError::Forbidden(_)))));

    let context_id = catalog::create_context_handler(
        State(app.state.clone()),
        Extension(admin),
        Json(context_request()),
    )
    .await
    .map(|(_, Json(context))| context.id)
    .unwrap_or_else(|_| unreachable!());

    let first = create_analysis(&app, alice, "Defaults").await;
    let second = create_analysis(&app, alice, "Prepayments").await;
    let dashboard_id = workspace::create_dashboard_handler(
        State(app.state.clone()),
        Extension(alice),
        Path(second),
        scope(None),
        Json(TitleRequest {
            title: "Overview".to_owned(),
        }),
    )
    .await
    .map(|(_, Json(dashboard))| dashboard.id)
    .unwrap_or_else(|_| unreachable!());

    let query_request = || CreateQueryRequest {
        dashboard_id,
        context_id,
        query_text: "How many loans defaulted?".to_owned(),
    };
    let mismatched = workspace::create_query_handler(
        State(app.state.clone()),
        Extension(alice),
        Path(first),
        scope(None),
        Json(query_request()),
    )
    .await;
    assert!(matches!(mismatched, Err(ApiError(AppError::Validation(_)))));

    let created = workspace::create_query_handler(
        State(app.state.clone()),
        Extension(alice),
        Path(second),
        scope(None),
        Json(query_request()),
    )
    .await
    .map(|(status, Json(query))| (status, query.analysis_id));
    assert_eq!(created.ok(), Some((StatusCode::CREATED, second)));
}
