use super::*;

impl WorkspaceTables {
    fn check_entity_name(&self, entity_id: Option<EntityId>, name: &str) -> AppResult<()> {
        if self
            .entities
            .values()
            .any(|entity| Some(entity.id) != entity_id && entity.name == name)
        {
            return Err(AppError::Conflict(format!(
                "entity with name '{name}' already exists"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EntityRepository for InMemoryWorkspaceStore {
    async fn list_entities(&self, page: Option<PageRequest>) -> AppResult<Vec<Entity>> {
        let tables = self.tables.read().await;
        Ok(page_slice(tables.entities.values().cloned().collect(), page))
    }

    async fn count_entities(&self) -> AppResult<i64> {
        let tables = self.tables.read().await;
        i64::try_from(tables.entities.len())
            .map_err(|error| AppError::Internal(format!("entity count overflow: {error}")))
    }

    async fn find_entity(&self, entity_id: EntityId) -> AppResult<Option<Entity>> {
        Ok(self.tables.read().await.entities.get(&entity_id).cloned())
    }

    async fn create_entity(&self, draft: EntityDraft) -> AppResult<Entity> {
        let mut tables = self.tables.write().await;
        tables.check_entity_name(None, draft.name())?;

        let entity = Entity {
            id: EntityId::from_i64(tables.next_id("entity")),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            created_at: Utc::now(),
        };
        tables.entities.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update_entity(
        &self,
        entity_id: EntityId,
        draft: EntityDraft,
    ) -> AppResult<Option<Entity>> {
        let mut tables = self.tables.write().await;
        if !tables.entities.contains_key(&entity_id) {
            return Ok(None);
        }
        tables.check_entity_name(Some(entity_id), draft.name())?;

        Ok(tables.entities.get_mut(&entity_id).map(|entity| {
            entity.name = draft.name().to_owned();
            entity.description = draft.description().map(str::to_owned);
            entity.clone()
        }))
    }

    async fn delete_entity(&self, entity_id: EntityId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.entities.remove(&entity_id).is_none() {
            return Ok(false);
        }

        tables
            .memberships
            .retain(|membership| membership.entity_id != entity_id);
        tables
            .context_links
            .retain(|(linked_entity, _)| *linked_entity != entity_id);
        Ok(true)
    }

    async fn add_membership(
        &self,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<EntityMembership> {
        let mut tables = self.tables.write().await;
        if !tables.entities.contains_key(&entity_id) {
            return Err(AppError::NotFound(format!(
                "entity {entity_id} does not exist"
            )));
        }
        if !tables.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user {user_id} does not exist")));
        }

        if let Some(existing) = tables
            .memberships
            .iter()
            .find(|membership| membership.entity_id == entity_id && membership.user_id == user_id)
        {
            return Ok(*existing);
        }

        let membership = EntityMembership {
            membership_id: tables.next_id("entity_membership"),
            entity_id,
            user_id,
            created_at: Utc::now(),
        };
        tables.memberships.push(membership);
        Ok(membership)
    }

    async fn remove_membership(&self, entity_id: EntityId, user_id: UserId) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.memberships.len();
        tables.memberships.retain(|membership| {
            !(membership.entity_id == entity_id && membership.user_id == user_id)
        });
        Ok(tables.memberships.len() != before)
    }

    async fn link_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.entities.contains_key(&entity_id) {
            return Err(AppError::NotFound(format!(
                "entity {entity_id} does not exist"
            )));
        }
        if !tables.contexts.contains_key(&context_id) {
            return Err(AppError::NotFound(format!(
                "context table {context_id} does not exist"
            )));
        }

        tables.context_links.insert((entity_id, context_id));
        Ok(())
    }

    async fn unlink_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .context_links
            .remove(&(entity_id, context_id)))
    }
}
