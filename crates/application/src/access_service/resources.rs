use super::*;

impl AccessService {
    /// Returns whether a principal may act on one resource.
    ///
    /// Missing resources are reported as inaccessible; callers check
    /// existence first when they need to tell the two apart.
    pub async fn is_resource_accessible(
        &self,
        principal: &Principal,
        resource: ResourceRef,
        selection: Option<TenantSelection>,
    ) -> AppResult<bool> {
        if principal.is_super_admin() {
            return Ok(true);
        }

        match self.anchors.resolve_anchor(resource).await? {
            Some(anchor) => self.is_anchor_accessible(principal, &anchor, selection).await,
            None => Ok(false),
        }
    }

    /// Requires that a resource exists and that the principal may act on it.
    pub async fn require_resource(
        &self,
        principal: &Principal,
        resource: ResourceRef,
        selection: Option<TenantSelection>,
    ) -> AppResult<()> {
        let Some(anchor) = self.anchors.resolve_anchor(resource).await? else {
            return Err(AppError::NotFound(format!("{resource} does not exist")));
        };

        if self.is_anchor_accessible(principal, &anchor, selection).await? {
            Ok(())
        } else {
            debug!(
                user_id = %principal.user_id(),
                resource = %resource,
                "resource is outside the principal's scope"
            );
            Err(insufficient_permissions())
        }
    }

    async fn is_anchor_accessible(
        &self,
        principal: &Principal,
        anchor: &ResourceAnchor,
        selection: Option<TenantSelection>,
    ) -> AppResult<bool> {
        if principal.is_super_admin() {
            return Ok(true);
        }

        match anchor {
            ResourceAnchor::Owner(owner_id) => {
                if principal.role() == Role::User {
                    return Ok(principal.is_active() && *owner_id == principal.user_id());
                }

                let accessible = self.accessible_entity_ids(principal, selection).await?;
                if accessible.is_empty() {
                    return Ok(false);
                }

                let owner_entity_ids = self.own_entity_ids(*owner_id).await?;
                Ok(!owner_entity_ids.is_disjoint(&accessible))
            }
            ResourceAnchor::Entities(entity_ids) => {
                if entity_ids.is_empty() {
                    return Ok(false);
                }

                let accessible = self.accessible_entity_ids(principal, selection).await?;
                Ok(!entity_ids.is_disjoint(&accessible))
            }
        }
    }
}
