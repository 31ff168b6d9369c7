use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use insightdeck_core::{AppError, UserId};
use tower_sessions::Session;
use tracing::debug;

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

/// Rebuilds the principal from storage on every request.
///
/// Only the user id lives in the session, so role changes, deactivation and
/// deletion take effect on the caller's next request.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user_id = session
        .get::<UserId>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let Some(user) = state.membership_repository.find_user(user_id).await? else {
        debug!(%user_id, "session refers to a deleted user");
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    };

    if !user.active {
        debug!(%user_id, "session refers to a deactivated user");
        return Err(AppError::Unauthorized("account is inactive".to_owned()).into());
    }

    request.extensions_mut().insert(user.principal());
    Ok(next.run(request).await)
}
