use super::*;

impl AccessService {
    /// Returns the users a principal may see, ordered by id.
    pub async fn accessible_users(&self, principal: &Principal) -> AppResult<Vec<UserAccount>> {
        match principal.role() {
            Role::SuperAdmin => self.memberships.list_active_users().await,
            Role::Admin => {
                let own_entity_ids = self.own_entity_ids(principal.user_id()).await?;
                if own_entity_ids.is_empty() {
                    warn!(
                        user_id = %principal.user_id(),
                        "admin has no entity memberships, no users are accessible"
                    );
                    return Ok(Vec::new());
                }

                self.memberships
                    .list_active_users_sharing_entities(&own_entity_ids)
                    .await
            }
            Role::User => Ok(self
                .memberships
                .find_user(principal.user_id())
                .await?
                .filter(|user| user.active)
                .into_iter()
                .collect()),
        }
    }

    /// Returns whether a principal may act on data scoped to another user.
    pub async fn can_see_user(&self, principal: &Principal, target: UserId) -> AppResult<bool> {
        match principal.role() {
            Role::SuperAdmin => Ok(true),
            Role::User => Ok(target == principal.user_id()),
            Role::Admin => {
                let own_entity_ids = self.own_entity_ids(principal.user_id()).await?;
                if own_entity_ids.is_empty() {
                    return Ok(false);
                }

                let target_entity_ids = self.own_entity_ids(target).await?;
                Ok(!own_entity_ids.is_disjoint(&target_entity_ids))
            }
        }
    }

    /// Loads a user and requires that the principal can see them.
    pub async fn require_visible_user(
        &self,
        principal: &Principal,
        target: UserId,
    ) -> AppResult<UserAccount> {
        let user = self
            .memberships
            .find_user(target)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {target} does not exist")))?;

        if !self.can_see_user(principal, target).await? {
            return Err(insufficient_permissions());
        }

        Ok(user)
    }
}
