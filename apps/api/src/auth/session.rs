use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use insightdeck_core::{AppError, Principal, UserId};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{EntityResponse, MeResponse, ScopeQuery, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let user_id = session
        .get::<UserId>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?;

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;

    if let Some(user_id) = user_id {
        info!(%user_id, "session closed");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<MeResponse>> {
    let selection = query.selection(&principal)?;
    let user = state
        .directory_service
        .get_user(&principal, principal.user_id())
        .await?;
    let primary_entity = state
        .tenancy_service
        .primary_entity(principal.user_id())
        .await?;
    let accessible_entity_ids = state
        .access_service
        .accessible_entity_ids(&principal, selection)
        .await?
        .into_iter()
        .map(|entity_id| entity_id.as_i64())
        .collect();

    Ok(Json(MeResponse {
        user: UserResponse::from(user),
        primary_entity: primary_entity.map(EntityResponse::from),
        accessible_entity_ids,
    }))
}
