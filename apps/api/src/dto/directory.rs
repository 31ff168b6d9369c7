use insightdeck_core::AppResult;
use insightdeck_domain::{UserAccount, UserDraft};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a user account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// One of `SUPERADMIN`, `ADMIN` or `USER`.
    pub role: String,
    pub active: bool,
    pub created_at: String,
}

impl From<UserAccount> for UserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            id: value.id.as_i64(),
            name: value.name,
            email: value.email,
            role: value.role.as_str().to_owned(),
            active: value.active,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Incoming payload for user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl CreateUserRequest {
    pub fn into_draft(self) -> AppResult<UserDraft> {
        UserDraft::new(self.name, self.email, self.role.as_str())
    }
}

/// Incoming payload for activating or deactivating a user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/set-user-active-request.ts"
)]
pub struct SetUserActiveRequest {
    pub active: bool,
}
