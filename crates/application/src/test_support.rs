use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use insightdeck_core::{AppError, AppResult, EntityId, Principal, Role, UserId};
use insightdeck_domain::{
    Entity, EntityDraft, EntityMembership, PageRequest, ResourceAnchor, ResourceKind,
    ResourceRef, UserAccount, UserDraft,
};
use tokio::sync::Mutex;

use crate::{
    AccessService, EntityRepository, MembershipRepository, ResourceAnchorRepository,
    UserRepository,
};

#[derive(Default)]
struct DirectoryState {
    users: Vec<UserAccount>,
    entities: Vec<Entity>,
    memberships: Vec<EntityMembership>,
    context_links: BTreeSet<(EntityId, i64)>,
    contexts: BTreeSet<i64>,
    next_id: i64,
}

impl DirectoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn entity_ids_of(&self, user_id: UserId) -> BTreeSet<EntityId> {
        self.memberships
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .map(|membership| membership.entity_id)
            .collect()
    }
}

/// Users, entities and membership edges kept behind one mutex.
#[derive(Default)]
pub(crate) struct FakeDirectory {
    state: Mutex<DirectoryState>,
}

impl FakeDirectory {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn access(self: &Arc<Self>) -> AccessService {
        AccessService::new(self.clone(), self.clone())
    }

    pub(crate) async fn seed_user(&self, email: &str, role: Role) -> Principal {
        let draft =
            UserDraft::new("Seeded", email, role.as_str()).unwrap_or_else(|_| unreachable!());
        self.create_user(draft, None)
            .await
            .map(|user| user.principal())
            .unwrap_or_else(|_| unreachable!())
    }

    pub(crate) async fn seed_entity(&self, name: &str, members: &[&Principal]) -> EntityId {
        let draft = EntityDraft::new(name, None).unwrap_or_else(|_| unreachable!());
        let entity_id = self
            .create_entity(draft)
            .await
            .map(|entity| entity.id)
            .unwrap_or_else(|_| unreachable!());
        for member in members {
            let added = self.add_membership(entity_id, member.user_id()).await;
            assert!(added.is_ok());
        }
        entity_id
    }

    pub(crate) async fn seed_context(&self, context_id: i64) {
        self.state.lock().await.contexts.insert(context_id);
    }

    pub(crate) async fn entity_ids_of(&self, user_id: UserId) -> BTreeSet<EntityId> {
        self.state.lock().await.entity_ids_of(user_id)
    }

    pub(crate) async fn context_entity_ids(&self, context_id: i64) -> BTreeSet<EntityId> {
        self.state
            .lock()
            .await
            .context_links
            .iter()
            .filter(|(_, linked)| *linked == context_id)
            .map(|(entity_id, _)| *entity_id)
            .collect()
    }
}

#[async_trait]
impl MembershipRepository for FakeDirectory {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn list_all_entity_ids(&self) -> AppResult<BTreeSet<EntityId>> {
        let state = self.state.lock().await;
        Ok(state.entities.iter().map(|entity| entity.id).collect())
    }

    async fn list_entity_ids_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<BTreeSet<EntityId>> {
        let state = self.state.lock().await;
        Ok(state
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
        let state = self.state.lock().await;
        Ok(state
            .memberships
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .copied()
            .collect())
    }

    async fn list_active_users(&self) -> AppResult<Vec<UserAccount>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().filter(|user| user.active).cloned().collect())
    }

    async fn list_active_users_sharing_entities(
        &self,
        entity_ids: &BTreeSet<EntityId>,
    ) -> AppResult<Vec<UserAccount>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .filter(|user| user.active && user.role != Role::SuperAdmin)
            .filter(|user| !state.entity_ids_of(user.id).is_disjoint(entity_ids))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResourceAnchorRepository for FakeDirectory {
    async fn resolve_anchor(&self, resource: ResourceRef) -> AppResult<Option<ResourceAnchor>> {
        if resource.kind != ResourceKind::ContextTable {
            return Ok(None);
        }

        let state = self.state.lock().await;
        if !state.contexts.contains(&resource.id) {
            return Ok(None);
        }

        Ok(Some(ResourceAnchor::Entities(
            state
                .context_links
                .iter()
                .filter(|(_, context_id)| *context_id == resource.id)
                .map(|(entity_id, _)| *entity_id)
                .collect(),
        )))
    }
}

#[async_trait]
impl UserRepository for FakeDirectory {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|user| user.email == email).cloned())
    }

    async fn create_user(
        &self,
        draft: UserDraft,
        home_entity: Option<EntityId>,
    ) -> AppResult<UserAccount> {
        let mut state = self.state.lock().await;
        let user = UserAccount {
            id: UserId::from_i64(state.next_id()),
            name: draft.name().to_owned(),
            email: draft.email().as_str().to_owned(),
            role: draft.role(),
            active: true,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        if let Some(entity_id) = home_entity {
            let membership = EntityMembership {
                membership_id: state.next_id(),
                entity_id,
                user_id: user.id,
                created_at: Utc::now(),
            };
            state.memberships.push(membership);
        }
        Ok(user)
    }

    async fn set_user_active(
        &self,
        user_id: UserId,
        active: bool,
    ) -> AppResult<Option<UserAccount>> {
        let mut state = self.state.lock().await;
        Ok(state
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .map(|user| {
                user.active = active;
                user.clone()
            }))
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|user| user.id != user_id);
        state
            .memberships
            .retain(|membership| membership.user_id != user_id);
        Ok(state.users.len() != before)
    }
}

#[async_trait]
impl EntityRepository for FakeDirectory {
    async fn list_entities(&self, page: Option<PageRequest>) -> AppResult<Vec<Entity>> {
        let state = self.state.lock().await;
        let (offset, size) = page
            .map(|page| (page.offset(), page.size()))
            .unwrap_or((0, i64::MAX));
        Ok(state
            .entities
            .iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(size).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_entities(&self) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(i64::try_from(state.entities.len()).unwrap_or_default())
    }

    async fn find_entity(&self, entity_id: EntityId) -> AppResult<Option<Entity>> {
        let state = self.state.lock().await;
        Ok(state
            .entities
            .iter()
            .find(|entity| entity.id == entity_id)
            .cloned())
    }

    async fn create_entity(&self, draft: EntityDraft) -> AppResult<Entity> {
        let mut state = self.state.lock().await;
        if state.entities.iter().any(|entity| entity.name == draft.name()) {
            return Err(AppError::Conflict(format!(
                "entity '{}' already exists",
                draft.name()
            )));
        }

        let entity = Entity {
            id: EntityId::from_i64(state.next_id()),
            name: draft.name().to_owned(),
            description: draft.description().map(str::to_owned),
            created_at: Utc::now(),
        };
        state.entities.push(entity.clone());
        Ok(entity)
    }

    async fn update_entity(
        &self,
        entity_id: EntityId,
        draft: EntityDraft,
    ) -> AppResult<Option<Entity>> {
        let mut state = self.state.lock().await;
        Ok(state
            .entities
            .iter_mut()
            .find(|entity| entity.id == entity_id)
            .map(|entity| {
                entity.name = draft.name().to_owned();
                entity.description = draft.description().map(str::to_owned);
                entity.clone()
            }))
    }

    async fn delete_entity(&self, entity_id: EntityId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.entities.len();
        state.entities.retain(|entity| entity.id != entity_id);
        state
            .memberships
            .retain(|membership| membership.entity_id != entity_id);
        state
            .context_links
            .retain(|(linked_entity, _)| *linked_entity != entity_id);
        Ok(state.entities.len() != before)
    }

    async fn add_membership(
        &self,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<EntityMembership> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.memberships.iter().find(|membership| {
            membership.entity_id == entity_id && membership.user_id == user_id
        }) {
            return Ok(*existing);
        }

        let membership = EntityMembership {
            membership_id: state.next_id(),
            entity_id,
            user_id,
            created_at: Utc::now(),
        };
        state.memberships.push(membership);
        Ok(membership)
    }

    async fn remove_membership(&self, entity_id: EntityId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.memberships.len();
        state.memberships.retain(|membership| {
            !(membership.entity_id == entity_id && membership.user_id == user_id)
        });
        Ok(state.memberships.len() != before)
    }

    async fn link_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<()> {
        self.state
            .lock()
            .await
            .context_links
            .insert((entity_id, context_id));
        Ok(())
    }

    async fn unlink_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .context_links
            .remove(&(entity_id, context_id)))
    }
}
