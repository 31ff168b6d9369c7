use std::sync::Arc;

use insightdeck_core::{AppError, AppResult, EntityId, Principal, Role, UserId};
use insightdeck_domain::{
    Entity, EntityDraft, EntityMembership, PageRequest, ResourceKind, ResourceRef,
    TenantSelection, primary_membership,
};
use tracing::info;

use crate::access_service::insufficient_permissions;
use crate::{AccessService, EntityRepository, MembershipRepository};

/// Entity administration, membership management and tenant selection.
#[derive(Clone)]
pub struct TenancyService {
    access: AccessService,
    memberships: Arc<dyn MembershipRepository>,
    entities: Arc<dyn EntityRepository>,
}

impl TenancyService {
    /// Creates a new tenancy service.
    #[must_use]
    pub fn new(
        access: AccessService,
        memberships: Arc<dyn MembershipRepository>,
        entities: Arc<dyn EntityRepository>,
    ) -> Self {
        Self {
            access,
            memberships,
            entities,
        }
    }

    /// Lists entities. SUPERADMIN only.
    pub async fn list_entities(
        &self,
        principal: &Principal,
        page: Option<PageRequest>,
    ) -> AppResult<Vec<Entity>> {
        require_super_admin(principal)?;
        self.entities.list_entities(page).await
    }

    /// Counts entities. SUPERADMIN only.
    pub async fn count_entities(&self, principal: &Principal) -> AppResult<i64> {
        require_super_admin(principal)?;
        self.entities.count_entities().await
    }

    /// Loads one entity. SUPERADMIN only.
    pub async fn get_entity(
        &self,
        principal: &Principal,
        entity_id: EntityId,
    ) -> AppResult<Entity> {
        require_super_admin(principal)?;
        self.find_entity(entity_id).await
    }

    /// Creates an entity. SUPERADMIN only.
    pub async fn create_entity(
        &self,
        principal: &Principal,
        draft: EntityDraft,
    ) -> AppResult<Entity> {
        require_super_admin(principal)?;

        let entity = self.entities.create_entity(draft).await?;
        info!(user_id = %principal.user_id(), entity_id = %entity.id, "created entity");
        Ok(entity)
    }

    /// Updates an entity. SUPERADMIN only.
    pub async fn update_entity(
        &self,
        principal: &Principal,
        entity_id: EntityId,
        draft: EntityDraft,
    ) -> AppResult<Entity> {
        require_super_admin(principal)?;

        self.entities
            .update_entity(entity_id, draft)
            .await?
            .ok_or_else(|| missing_entity(entity_id))
    }

    /// Deletes an entity together with its membership and context edges.
    /// SUPERADMIN only.
    pub async fn delete_entity(&self, principal: &Principal, entity_id: EntityId) -> AppResult<()> {
        require_super_admin(principal)?;

        if !self.entities.delete_entity(entity_id).await? {
            return Err(missing_entity(entity_id));
        }

        info!(user_id = %principal.user_id(), entity_id = %entity_id, "deleted entity");
        Ok(())
    }

    /// Adds a user to an entity. SUPERADMIN only.
    pub async fn add_member(
        &self,
        principal: &Principal,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<EntityMembership> {
        require_super_admin(principal)?;
        self.find_entity(entity_id).await?;
        self.access.require_visible_user(principal, user_id).await?;

        let membership = self.entities.add_membership(entity_id, user_id).await?;
        info!(
            user_id = %principal.user_id(),
            entity_id = %entity_id,
            member_id = %user_id,
            "added entity member"
        );
        Ok(membership)
    }

    /// Removes a user from an entity. SUPERADMIN only.
    pub async fn remove_member(
        &self,
        principal: &Principal,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<()> {
        require_super_admin(principal)?;

        if !self.entities.remove_membership(entity_id, user_id).await? {
            return Err(AppError::NotFound(format!(
                "user {user_id} is not a member of entity {entity_id}"
            )));
        }

        info!(
            user_id = %principal.user_id(),
            entity_id = %entity_id,
            member_id = %user_id,
            "removed entity member"
        );
        Ok(())
    }

    /// Shares a context table with an entity. SUPERADMIN only.
    pub async fn link_context(
        &self,
        principal: &Principal,
        entity_id: EntityId,
        context_id: i64,
    ) -> AppResult<()> {
        require_super_admin(principal)?;
        self.find_entity(entity_id).await?;
        self.access
            .require_resource(
                principal,
                ResourceRef::new(ResourceKind::ContextTable, context_id),
                None,
            )
            .await?;

        self.entities.link_context(entity_id, context_id).await
    }

    /// Stops sharing a context table with an entity. SUPERADMIN only.
    pub async fn unlink_context(
        &self,
        principal: &Principal,
        entity_id: EntityId,
        context_id: i64,
    ) -> AppResult<()> {
        require_super_admin(principal)?;

        if !self.entities.unlink_context(entity_id, context_id).await? {
            return Err(AppError::NotFound(format!(
                "context table {context_id} is not linked to entity {entity_id}"
            )));
        }

        Ok(())
    }

    /// Returns the primary entity of a user, if they belong to any.
    pub async fn primary_entity(&self, user_id: UserId) -> AppResult<Option<Entity>> {
        let memberships = self.memberships.list_memberships_for_user(user_id).await?;
        match primary_membership(&memberships) {
            Some(membership) => self.entities.find_entity(membership.entity_id).await,
            None => Ok(None),
        }
    }

    /// Returns the entities shown for a user the principal can see.
    ///
    /// A SUPERADMIN target spans every entity. Anyone else is shown their
    /// primary entity, or nothing when they belong to none.
    pub async fn user_entities(
        &self,
        principal: &Principal,
        user_id: UserId,
    ) -> AppResult<Vec<Entity>> {
        let target = self.access.require_visible_user(principal, user_id).await?;
        if target.role == Role::SuperAdmin {
            return self.entities.list_entities(None).await;
        }

        Ok(self.primary_entity(target.id).await?.into_iter().collect())
    }

    /// Validates a SUPERADMIN's request to switch entity scope.
    ///
    /// The returned selection is held by the client and sent back on every
    /// request; nothing is stored server side.
    pub async fn select_entity(
        &self,
        principal: &Principal,
        raw_entity_id: i64,
    ) -> AppResult<TenantSelection> {
        require_super_admin(principal)?;

        let selection = TenantSelection::from_request(principal.role(), Some(raw_entity_id))?
            .unwrap_or(TenantSelection::AllEntities);
        if let TenantSelection::Entity(entity_id) = selection {
            self.find_entity(entity_id).await?;
        }

        info!(
            user_id = %principal.user_id(),
            selection = selection.as_wire(),
            "validated entity selection"
        );
        Ok(selection)
    }

    async fn find_entity(&self, entity_id: EntityId) -> AppResult<Entity> {
        self.entities
            .find_entity(entity_id)
            .await?
            .ok_or_else(|| missing_entity(entity_id))
    }
}

fn require_super_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_super_admin() {
        Ok(())
    } else {
        Err(insufficient_permissions())
    }
}

fn missing_entity(entity_id: EntityId) -> AppError {
    AppError::NotFound(format!("entity {entity_id} does not exist"))
}

#[cfg(test)]
mod tests;
