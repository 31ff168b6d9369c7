use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use insightdeck_core::{EntityId, Principal, UserId};

use crate::dto::{
    CountResponse, EntityResponse, ListQuery, MembershipResponse, SaveEntityRequest,
    TenantSelectionResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_entities_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    let entities = state
        .tenancy_service
        .list_entities(&principal, Some(query.page_request()?))
        .await?
        .into_iter()
        .map(EntityResponse::from)
        .collect();

    Ok(Json(entities))
}

pub async fn list_all_entities_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    let entities = state
        .tenancy_service
        .list_entities(&principal, None)
        .await?
        .into_iter()
        .map(EntityResponse::from)
        .collect();

    Ok(Json(entities))
}

pub async fn count_entities_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.tenancy_service.count_entities(&principal).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn get_entity_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(entity_id): Path<i64>,
) -> ApiResult<Json<EntityResponse>> {
    let entity = state
        .tenancy_service
        .get_entity(&principal, EntityId::from_i64(entity_id))
        .await?;

    Ok(Json(EntityResponse::from(entity)))
}

pub async fn create_entity_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SaveEntityRequest>,
) -> ApiResult<(StatusCode, Json<EntityResponse>)> {
    let entity = state
        .tenancy_service
        .create_entity(&principal, payload.into_draft()?)
        .await?;

    Ok((StatusCode::CREATED, Json(EntityResponse::from(entity))))
}

pub async fn update_entity_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(entity_id): Path<i64>,
    Json(payload): Json<SaveEntityRequest>,
) -> ApiResult<Json<EntityResponse>> {
    let entity = state
        .tenancy_service
        .update_entity(
            &principal,
            EntityId::from_i64(entity_id),
            payload.into_draft()?,
        )
        .await?;

    Ok(Json(EntityResponse::from(entity)))
}

pub async fn delete_entity_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(entity_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .tenancy_service
        .delete_entity(&principal, EntityId::from_i64(entity_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Validates a tenant switch. The selection is held by the client and sent
/// back as `entity_id` on later requests.
pub async fn select_entity_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(entity_id): Path<i64>,
) -> ApiResult<Json<TenantSelectionResponse>> {
    let selection = state
        .tenancy_service
        .select_entity(&principal, entity_id)
        .await?;

    Ok(Json(TenantSelectionResponse::from(selection)))
}

pub async fn add_member_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((entity_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Json<MembershipResponse>> {
    let membership = state
        .tenancy_service
        .add_member(
            &principal,
            EntityId::from_i64(entity_id),
            UserId::from_i64(user_id),
        )
        .await?;

    Ok(Json(MembershipResponse::from(membership)))
}

pub async fn remove_member_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((entity_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .tenancy_service
        .remove_member(
            &principal,
            EntityId::from_i64(entity_id),
            UserId::from_i64(user_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn link_context_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((entity_id, context_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .tenancy_service
        .link_context(&principal, EntityId::from_i64(entity_id), context_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlink_context_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((entity_id, context_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .tenancy_service
        .unlink_context(&principal, EntityId::from_i64(entity_id), context_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn user_entities_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<EntityResponse>>> {
    let entities = state
        .tenancy_service
        .user_entities(&principal, UserId::from_i64(user_id))
        .await?
        .into_iter()
        .map(EntityResponse::from)
        .collect();

    Ok(Json(entities))
}
