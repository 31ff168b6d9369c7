use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use insightdeck_core::{AppError, UserId};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::BootstrapRequest;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

/// Opens a session for an existing active user holding the shared token.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        warn!(user_id = payload.user_id, "bootstrap rejected: invalid token");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = UserId::from_i64(payload.user_id);
    let user = state
        .membership_repository
        .find_user(user_id)
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| AppError::Unauthorized("unknown or inactive user".to_owned()))?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(%user_id, role = %user.role, "session established");
    Ok(StatusCode::NO_CONTENT)
}
