//! Read, count and delete endpoints shared by every scoped resource kind.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{MethodRouter, get};
use insightdeck_application::ResourceService;
use insightdeck_core::Principal;
use insightdeck_domain::{
    Analysis, AnalysisQuery, ContextTable, Dashboard, GeneralQuery, Navigation, QueryResult,
    ResourceParent, ScopedResource,
};
use serde::Serialize;

use crate::dto::{
    AnalysisResponse, ContextTableResponse, CountResponse, DashboardResponse,
    GeneralQueryResponse, ListQuery, NavigationResponse, QueryResponse, QueryResultResponse,
    ScopeQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Ties a record type to its service and wire representation.
pub trait ResourceEndpoint: ScopedResource {
    type Response: Serialize + From<Self> + Send + 'static;

    fn service(state: &AppState) -> &ResourceService<Self>;
}

macro_rules! resource_endpoint {
    ($record:ty, $response:ty, $field:ident) => {
        impl ResourceEndpoint for $record {
            type Response = $response;

            fn service(state: &AppState) -> &ResourceService<Self> {
                &state.$field
            }
        }
    };
}

resource_endpoint!(Analysis, AnalysisResponse, analyses);
resource_endpoint!(Dashboard, DashboardResponse, dashboards);
resource_endpoint!(AnalysisQuery, QueryResponse, queries);
resource_endpoint!(QueryResult, QueryResultResponse, query_results);
resource_endpoint!(ContextTable, ContextTableResponse, contexts);
resource_endpoint!(Navigation, NavigationResponse, navigations);
resource_endpoint!(GeneralQuery, GeneralQueryResponse, general_queries);

fn respond<R: ResourceEndpoint>(records: Vec<R>) -> Json<Vec<R::Response>> {
    Json(records.into_iter().map(R::Response::from).collect())
}

pub async fn list_handler<R: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<R::Response>>> {
    let records = R::service(&state)
        .list_page(
            &principal,
            query.selection(&principal)?,
            query.page_request()?,
        )
        .await?;

    Ok(respond(records))
}

pub async fn list_all_handler<R: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<R::Response>>> {
    let records = R::service(&state)
        .list_all(&principal, query.selection(&principal)?)
        .await?;

    Ok(respond(records))
}

pub async fn count_handler<R: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<CountResponse>> {
    let count = R::service(&state)
        .count(&principal, query.selection(&principal)?)
        .await?;

    Ok(Json(CountResponse { count }))
}

pub async fn get_handler<R: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<R::Response>> {
    let record = R::service(&state)
        .get(&principal, id, query.selection(&principal)?)
        .await?;

    Ok(Json(R::Response::from(record)))
}

pub async fn delete_handler<R: ResourceEndpoint>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    R::service(&state)
        .delete(&principal, id, query.selection(&principal)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET` route listing the `R` children of the parent named by the `{id}`
/// path segment. Paging applies only when `page` or `size` is given.
pub fn children_route<R: ResourceEndpoint>(
    parent: fn(i64) -> ResourceParent,
) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              Extension(principal): Extension<Principal>,
              Path(parent_id): Path<i64>,
              Query(query): Query<ListQuery>| async move {
            let records = R::service(&state)
                .list_children(
                    &principal,
                    query.selection(&principal)?,
                    parent(parent_id),
                    query.optional_page_request()?,
                )
                .await?;

            ApiResult::Ok(respond(records))
        },
    )
}

/// `GET` route counting the `R` children of the parent named by `{id}`.
pub fn child_count_route<R: ResourceEndpoint>(
    parent: fn(i64) -> ResourceParent,
) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              Extension(principal): Extension<Principal>,
              Path(parent_id): Path<i64>,
              Query(query): Query<ScopeQuery>| async move {
            let count = R::service(&state)
                .count_children(&principal, query.selection(&principal)?, parent(parent_id))
                .await?;

            ApiResult::Ok(Json(CountResponse { count }))
        },
    )
}
