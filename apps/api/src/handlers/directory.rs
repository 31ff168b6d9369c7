use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use insightdeck_core::{Principal, UserId};

use crate::dto::{CountResponse, CreateUserRequest, ListQuery, SetUserActiveRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .directory_service
        .list_users(&principal, Some(query.page_request()?))
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn list_all_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .directory_service
        .list_users(&principal, None)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn count_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<CountResponse>> {
    let count = state.directory_service.count_users(&principal).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .directory_service
        .get_user(&principal, UserId::from_i64(user_id))
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .directory_service
        .create_user(&principal, payload.into_draft()?)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .directory_service
        .delete_user(&principal, UserId::from_i64(user_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_user_active_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<SetUserActiveRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .directory_service
        .set_user_active(&principal, UserId::from_i64(user_id), payload.active)
        .await?;

    Ok(Json(UserResponse::from(user)))
}
