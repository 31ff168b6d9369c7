use super::*;

#[async_trait]
impl MembershipRepository for InMemoryWorkspaceStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn list_all_entity_ids(&self) -> AppResult<BTreeSet<EntityId>> {
        Ok(self.tables.read().await.entities.keys().copied().collect())
    }

    async fn list_entity_ids_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<BTreeSet<EntityId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|membership| user_ids.contains(&membership.user_id))
            .map(|membership| membership.entity_id)
            .collect())
    }

    async fn list_memberships_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<EntityMembership>> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .copied()
            .collect())
    }

    async fn list_active_users(&self) -> AppResult<Vec<UserAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| user.active)
            .cloned()
            .collect())
    }

    async fn list_active_users_sharing_entities(
        &self,
        entity_ids: &BTreeSet<EntityId>,
    ) -> AppResult<Vec<UserAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| user.active && user.role != Role::SuperAdmin)
            .filter(|user| !tables.entity_ids_of(user.id).is_disjoint(entity_ids))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResourceAnchorRepository for InMemoryWorkspaceStore {
    async fn resolve_anchor(&self, resource: ResourceRef) -> AppResult<Option<ResourceAnchor>> {
        Ok(self.tables.read().await.anchor_of(resource))
    }
}
