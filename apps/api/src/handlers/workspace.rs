use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use insightdeck_core::Principal;
use insightdeck_domain::DashboardDraft;

use crate::dto::{
    AnalysisResponse, CreateQueryRequest, CreateQueryResultRequest, DashboardResponse,
    QueryResponse, QueryResultResponse, ScopeQuery, TitleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_analysis_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<TitleRequest>,
) -> ApiResult<(StatusCode, Json<AnalysisResponse>)> {
    let analysis = state
        .workspace_service
        .create_analysis(&principal, payload.title.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(AnalysisResponse::from(analysis))))
}

pub async fn rename_analysis_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(analysis_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<TitleRequest>,
) -> ApiResult<Json<AnalysisResponse>> {
    let analysis = state
        .workspace_service
        .rename_analysis(
            &principal,
            query.selection(&principal)?,
            analysis_id,
            payload.title.as_str(),
        )
        .await?;

    Ok(Json(AnalysisResponse::from(analysis)))
}

pub async fn create_dashboard_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(analysis_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<TitleRequest>,
) -> ApiResult<(StatusCode, Json<DashboardResponse>)> {
    let dashboard = state
        .workspace_service
        .create_dashboard(
            &principal,
            query.selection(&principal)?,
            DashboardDraft::new(analysis_id, payload.title)?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DashboardResponse::from(dashboard))))
}

pub async fn rename_dashboard_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(dashboard_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<TitleRequest>,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = state
        .workspace_service
        .rename_dashboard(
            &principal,
            query.selection(&principal)?,
            dashboard_id,
            payload.title.as_str(),
        )
        .await?;

    Ok(Json(DashboardResponse::from(dashboard)))
}

pub async fn create_query_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(analysis_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<CreateQueryRequest>,
) -> ApiResult<(StatusCode, Json<QueryResponse>)> {
    let created = state
        .workspace_service
        .create_query(
            &principal,
            query.selection(&principal)?,
            payload.into_draft(analysis_id)?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(QueryResponse::from(created))))
}

pub async fn record_query_result_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(query_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<CreateQueryResultRequest>,
) -> ApiResult<(StatusCode, Json<QueryResultResponse>)> {
    let result = state
        .workspace_service
        .record_query_result(
            &principal,
            query.selection(&principal)?,
            payload.into_draft(query_id)?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(QueryResultResponse::from(result))))
}
