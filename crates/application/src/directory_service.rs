use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, Principal, Role, UserId};
use insightdeck_domain::{PageRequest, UserAccount, UserDraft, primary_membership};
use tracing::info;

use crate::access_service::insufficient_permissions;
use crate::{AccessService, MembershipRepository, UserRepository};

/// Role-scoped user directory.
#[derive(Clone)]
pub struct DirectoryService {
    access: AccessService,
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl DirectoryService {
    /// Creates a new directory service.
    #[must_use]
    pub fn new(
        access: AccessService,
        memberships: Arc<dyn MembershipRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            access,
            memberships,
            users,
        }
    }

    /// Lists the users a principal may see, optionally paged.
    pub async fn list_users(
        &self,
        principal: &Principal,
        page: Option<PageRequest>,
    ) -> AppResult<Vec<UserAccount>> {
        let users = self.access.accessible_users(principal).await?;
        let Some(page) = page else {
            return Ok(users);
        };

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(page.size()).unwrap_or(usize::MAX);
        Ok(users.into_iter().skip(offset).take(size).collect())
    }

    /// Counts the users a principal may see.
    pub async fn count_users(&self, principal: &Principal) -> AppResult<i64> {
        let users = self.access.accessible_users(principal).await?;
        i64::try_from(users.len())
            .map_err(|error| AppError::Internal(format!("user count overflow: {error}")))
    }

    /// Loads one user the principal may see.
    pub async fn get_user(&self, principal: &Principal, user_id: UserId) -> AppResult<UserAccount> {
        self.access.require_visible_user(principal, user_id).await
    }

    /// Creates a user and places them in the creator's primary entity.
    ///
    /// ADMIN creators must belong to an entity and cannot create SUPERADMIN
    /// accounts.
    pub async fn create_user(
        &self,
        principal: &Principal,
        draft: UserDraft,
    ) -> AppResult<UserAccount> {
        if !principal.role().is_admin_or_above() {
            return Err(insufficient_permissions());
        }
        if principal.role() == Role::Admin && draft.role() == Role::SuperAdmin {
            return Err(insufficient_permissions());
        }

        let creator_memberships = self
            .memberships
            .list_memberships_for_user(principal.user_id())
            .await?;
        let home_entity = primary_membership(&creator_memberships).map(|edge| edge.entity_id);
        if principal.role() == Role::Admin && home_entity.is_none() {
            return Err(AppError::Validation(
                "admin must be mapped to an entity".to_owned(),
            ));
        }

        if self
            .users
            .find_user_by_email(draft.email().as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "user with email '{}' already exists",
                draft.email().as_str()
            )));
        }

        let user = self.users.create_user(draft, home_entity).await?;

        info!(
            user_id = %principal.user_id(),
            created_user_id = %user.id,
            role = %user.role,
            "created user"
        );
        Ok(user)
    }

    /// Deletes a user the principal may manage. Nobody can delete themselves.
    pub async fn delete_user(&self, principal: &Principal, user_id: UserId) -> AppResult<()> {
        self.require_manageable(principal, user_id).await?;
        if user_id == principal.user_id() {
            return Err(AppError::Validation(
                "users cannot delete their own account".to_owned(),
            ));
        }

        if !self.users.delete_user(user_id).await? {
            return Err(AppError::NotFound(format!("user {user_id} does not exist")));
        }

        info!(user_id = %principal.user_id(), deleted_user_id = %user_id, "deleted user");
        Ok(())
    }

    /// Activates or deactivates a user the principal may manage.
    pub async fn set_user_active(
        &self,
        principal: &Principal,
        user_id: UserId,
        active: bool,
    ) -> AppResult<UserAccount> {
        self.require_manageable(principal, user_id).await?;
        if user_id == principal.user_id() && !active {
            return Err(AppError::Validation(
                "users cannot deactivate their own account".to_owned(),
            ));
        }

        let user = self
            .users
            .set_user_active(user_id, active)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} does not exist")))?;

        info!(
            user_id = %principal.user_id(),
            target_user_id = %user_id,
            active,
            "changed user activity"
        );
        Ok(user)
    }

    async fn require_manageable(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> AppResult<UserAccount> {
        if !principal.role().is_admin_or_above() {
            return Err(insufficient_permissions());
        }

        let target = self.access.require_visible_user(principal, user_id).await?;
        if principal.role() == Role::Admin && target.role == Role::SuperAdmin {
            return Err(insufficient_permissions());
        }

        Ok(target)
    }
}
