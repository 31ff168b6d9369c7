use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{EntityResponse, UserResponse};

/// Incoming payload for opening a session.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub user_id: i64,
    pub token: String,
}

/// The authenticated caller together with their tenancy.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub user: UserResponse,
    pub primary_entity: Option<EntityResponse>,
    /// Entities in scope for the current tenant selection.
    pub accessible_entity_ids: Vec<i64>,
}
