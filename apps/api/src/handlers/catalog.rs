use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use insightdeck_core::Principal;

use crate::dto::{
    ContextTableResponse, GeneralQueryResponse, NavigationResponse, SaveContextTableRequest,
    SaveGeneralQueryRequest, SaveNavigationRequest, ScopeQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_context_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SaveContextTableRequest>,
) -> ApiResult<(StatusCode, Json<ContextTableResponse>)> {
    let context = state
        .catalog_service
        .create_context(&principal, payload.into_draft()?)
        .await?;

    Ok((StatusCode::CREATED, Json(ContextTableResponse::from(context))))
}

pub async fn update_context_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(context_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<SaveContextTableRequest>,
) -> ApiResult<Json<ContextTableResponse>> {
    let context = state
        .catalog_service
        .update_context(
            &principal,
            query.selection(&principal)?,
            context_id,
            payload.into_draft()?,
        )
        .await?;

    Ok(Json(ContextTableResponse::from(context)))
}

pub async fn create_navigation_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(context_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<SaveNavigationRequest>,
) -> ApiResult<(StatusCode, Json<NavigationResponse>)> {
    let navigation = state
        .catalog_service
        .create_navigation(
            &principal,
            query.selection(&principal)?,
            context_id,
            payload.into_draft()?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(NavigationResponse::from(navigation))))
}

pub async fn update_navigation_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(navigation_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<SaveNavigationRequest>,
) -> ApiResult<Json<NavigationResponse>> {
    let navigation = state
        .catalog_service
        .update_navigation(
            &principal,
            query.selection(&principal)?,
            navigation_id,
            payload.into_draft()?,
        )
        .await?;

    Ok(Json(NavigationResponse::from(navigation)))
}

pub async fn link_navigation_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((context_id, navigation_id)): Path<(i64, i64)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .link_navigation(
            &principal,
            query.selection(&principal)?,
            context_id,
            navigation_id,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlink_navigation_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((context_id, navigation_id)): Path<(i64, i64)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .unlink_navigation(
            &principal,
            query.selection(&principal)?,
            context_id,
            navigation_id,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_general_query_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(navigation_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<SaveGeneralQueryRequest>,
) -> ApiResult<(StatusCode, Json<GeneralQueryResponse>)> {
    let general_query = state
        .catalog_service
        .create_general_query(
            &principal,
            query.selection(&principal)?,
            navigation_id,
            payload.into_draft()?,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GeneralQueryResponse::from(general_query)),
    ))
}

pub async fn update_general_query_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(general_query_id): Path<i64>,
    Query(query): Query<ScopeQuery>,
    Json(payload): Json<SaveGeneralQueryRequest>,
) -> ApiResult<Json<GeneralQueryResponse>> {
    let general_query = state
        .catalog_service
        .update_general_query(
            &principal,
            query.selection(&principal)?,
            general_query_id,
            payload.into_draft()?,
        )
        .await?;

    Ok(Json(GeneralQueryResponse::from(general_query)))
}

pub async fn link_general_query_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((navigation_id, general_query_id)): Path<(i64, i64)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .link_general_query(
            &principal,
            query.selection(&principal)?,
            navigation_id,
            general_query_id,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlink_general_query_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((navigation_id, general_query_id)): Path<(i64, i64)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    state
        .catalog_service
        .unlink_general_query(
            &principal,
            query.selection(&principal)?,
            navigation_id,
            general_query_id,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
