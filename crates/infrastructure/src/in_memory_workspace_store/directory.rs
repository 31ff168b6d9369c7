use super::*;

#[async_trait]
impl UserRepository for InMemoryWorkspaceStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(
        &self,
        draft: UserDraft,
        home_entity: Option<EntityId>,
    ) -> AppResult<UserAccount> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|user| user.email == draft.email().as_str())
        {
            return Err(AppError::Conflict(format!(
                "user with email '{}' already exists",
                draft.email().as_str()
            )));
        }
        if let Some(entity_id) = home_entity
            && !tables.entities.contains_key(&entity_id)
        {
            return Err(AppError::NotFound(format!(
                "entity {entity_id} does not exist"
            )));
        }

        let user = UserAccount {
            id: UserId::from_i64(tables.next_id("user")),
            name: draft.name().to_owned(),
            email: draft.email().as_str().to_owned(),
            role: draft.role(),
            active: true,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        if let Some(entity_id) = home_entity {
            let membership = EntityMembership {
                membership_id: tables.next_id("entity_membership"),
                entity_id,
                user_id: user.id,
                created_at: Utc::now(),
            };
            tables.memberships.push(membership);
        }
        Ok(user)
    }

    async fn set_user_active(
        &self,
        user_id: UserId,
        active: bool,
    ) -> AppResult<Option<UserAccount>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&user_id).map(|user| {
            user.active = active;
            user.clone()
        }))
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user_id).is_none() {
            return Ok(false);
        }

        tables
            .memberships
            .retain(|membership| membership.user_id != user_id);
        let owned: Vec<i64> = tables
            .analyses
            .values()
            .filter(|analysis| analysis.owner_id == user_id)
            .map(|analysis| analysis.id)
            .collect();
        for analysis_id in owned {
            tables.remove_analysis(analysis_id);
        }

        Ok(true)
    }
}
