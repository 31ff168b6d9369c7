use async_trait::async_trait;
use insightdeck_core::{AppResult, EntityId, UserId};
use insightdeck_domain::{UserAccount, UserDraft};

/// Port for user account persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user account by normalized email.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    /// Creates an active user account. Duplicate emails are a conflict.
    ///
    /// When `home_entity` is given the account joins it in the same write,
    /// and an unknown entity leaves nothing behind.
    async fn create_user(
        &self,
        draft: UserDraft,
        home_entity: Option<EntityId>,
    ) -> AppResult<UserAccount>;

    /// Sets the active flag, `None` when the user does not exist.
    async fn set_user_active(&self, user_id: UserId, active: bool)
    -> AppResult<Option<UserAccount>>;

    /// Deletes a user with their memberships and analyses.
    async fn delete_user(&self, user_id: UserId) -> AppResult<bool>;
}
