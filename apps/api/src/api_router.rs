use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use insightdeck_core::{AppError, UserId};
use insightdeck_domain::{
    Analysis, AnalysisQuery, ContextTable, Dashboard, GeneralQuery, Navigation, QueryResult,
    ResourceParent,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::handlers::resources::{
    self, ResourceEndpoint, child_count_route, children_route,
};
use crate::handlers::{catalog, directory, tenancy, workspace};
use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let cors_layer = build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes(app_state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

fn protected_routes(app_state: AppState) -> Router<AppState> {
    let router = Router::new().route("/auth/me", get(auth::me_handler));
    let router = resource_routes::<Analysis>(router, "/api/analyses");
    let router = resource_routes::<Dashboard>(router, "/api/dashboards");
    let router = resource_routes::<AnalysisQuery>(router, "/api/queries");
    let router = resource_routes::<QueryResult>(router, "/api/query-results");
    let router = resource_routes::<ContextTable>(router, "/api/contexts");
    let router = resource_routes::<Navigation>(router, "/api/navigations");
    let router = resource_routes::<GeneralQuery>(router, "/api/general-queries");

    router
        .merge(workspace_routes())
        .merge(catalog_routes())
        .merge(tenancy_routes())
        .merge(directory_routes())
        .route_layer(from_fn_with_state(app_state, middleware::require_auth))
}

/// Registers the paged list, `all`, `count`, get and delete routes of a kind.
fn resource_routes<R: ResourceEndpoint>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(resources::list_handler::<R>))
        .route(
            &format!("{base}/all"),
            get(resources::list_all_handler::<R>),
        )
        .route(
            &format!("{base}/count"),
            get(resources::count_handler::<R>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(resources::get_handler::<R>).delete(resources::delete_handler::<R>),
        )
}

fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyses", post(workspace::create_analysis_handler))
        .route(
            "/api/analyses/{id}",
            put(workspace::rename_analysis_handler),
        )
        .route(
            "/api/users/{id}/analyses",
            children_route::<Analysis>(|id| ResourceParent::Owner(UserId::from_i64(id))),
        )
        .route(
            "/api/users/{id}/analyses/count",
            child_count_route::<Analysis>(|id| ResourceParent::Owner(UserId::from_i64(id))),
        )
        .route(
            "/api/analyses/{id}/dashboards",
            children_route::<Dashboard>(ResourceParent::Analysis)
                .post(workspace::create_dashboard_handler),
        )
        .route(
            "/api/analyses/{id}/dashboards/count",
            child_count_route::<Dashboard>(ResourceParent::Analysis),
        )
        .route(
            "/api/analyses/{id}/queries",
            children_route::<AnalysisQuery>(ResourceParent::Analysis)
                .post(workspace::create_query_handler),
        )
        .route(
            "/api/analyses/{id}/queries/count",
            child_count_route::<AnalysisQuery>(ResourceParent::Analysis),
        )
        .route(
            "/api/dashboards/{id}",
            put(workspace::rename_dashboard_handler),
        )
        .route(
            "/api/dashboards/{id}/queries",
            children_route::<AnalysisQuery>(ResourceParent::Dashboard),
        )
        .route(
            "/api/dashboards/{id}/queries/count",
            child_count_route::<AnalysisQuery>(ResourceParent::Dashboard),
        )
        .route(
            "/api/queries/{id}/results",
            children_route::<QueryResult>(ResourceParent::Query)
                .post(workspace::record_query_result_handler),
        )
        .route(
            "/api/queries/{id}/results/count",
            child_count_route::<QueryResult>(ResourceParent::Query),
        )
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contexts", post(catalog::create_context_handler))
        .route("/api/contexts/{id}", put(catalog::update_context_handler))
        .route(
            "/api/contexts/{id}/navigations",
            children_route::<Navigation>(ResourceParent::Context)
                .post(catalog::create_navigation_handler),
        )
        .route(
            "/api/contexts/{id}/navigations/count",
            child_count_route::<Navigation>(ResourceParent::Context),
        )
        .route(
            "/api/contexts/{id}/navigations/{navigation_id}",
            put(catalog::link_navigation_handler).delete(catalog::unlink_navigation_handler),
        )
        .route(
            "/api/navigations/{id}",
            put(catalog::update_navigation_handler),
        )
        .route(
            "/api/navigations/{id}/general-queries",
            children_route::<GeneralQuery>(ResourceParent::Navigation)
                .post(catalog::create_general_query_handler),
        )
        .route(
            "/api/navigations/{id}/general-queries/count",
            child_count_route::<GeneralQuery>(ResourceParent::Navigation),
        )
        .route(
            "/api/navigations/{id}/general-queries/{general_query_id}",
            put(catalog::link_general_query_handler)
                .delete(catalog::unlink_general_query_handler),
        )
        .route(
            "/api/general-queries/{id}",
            put(catalog::update_general_query_handler),
        )
}

fn tenancy_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/entities",
            get(tenancy::list_entities_handler).post(tenancy::create_entity_handler),
        )
        .route("/api/entities/all", get(tenancy::list_all_entities_handler))
        .route("/api/entities/count", get(tenancy::count_entities_handler))
        .route(
            "/api/entities/{id}",
            get(tenancy::get_entity_handler)
                .put(tenancy::update_entity_handler)
                .delete(tenancy::delete_entity_handler),
        )
        .route(
            "/api/entities/{id}/select",
            post(tenancy::select_entity_handler),
        )
        .route(
            "/api/entities/{id}/members/{user_id}",
            put(tenancy::add_member_handler).delete(tenancy::remove_member_handler),
        )
        .route(
            "/api/entities/{id}/contexts/{context_id}",
            put(tenancy::link_context_handler).delete(tenancy::unlink_context_handler),
        )
        .route(
            "/api/users/{id}/entities",
            get(tenancy::user_entities_handler),
        )
}

fn directory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/users",
            get(directory::list_users_handler).post(directory::create_user_handler),
        )
        .route("/api/users/all", get(directory::list_all_users_handler))
        .route("/api/users/count", get(directory::count_users_handler))
        .route(
            "/api/users/{id}",
            get(directory::get_user_handler).delete(directory::delete_user_handler),
        )
        .route(
            "/api/users/{id}/active",
            put(directory::set_user_active_handler),
        )
}
