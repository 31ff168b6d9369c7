use super::*;

impl AccessService {
    /// Returns the entity ids a principal may act within for one request.
    ///
    /// SUPERADMIN principals follow the selection: all entities when it is
    /// absent or [`TenantSelection::AllEntities`], otherwise exactly the chosen
    /// id, whether or not it exists. Other roles ignore the selection and get
    /// the memberships of every user they can see.
    pub async fn accessible_entity_ids(
        &self,
        principal: &Principal,
        selection: Option<TenantSelection>,
    ) -> AppResult<BTreeSet<EntityId>> {
        let entity_ids = match principal.role() {
            Role::SuperAdmin => match selection.unwrap_or(TenantSelection::AllEntities) {
                TenantSelection::AllEntities => self.memberships.list_all_entity_ids().await?,
                TenantSelection::Entity(entity_id) => BTreeSet::from([entity_id]),
            },
            Role::Admin | Role::User => {
                let user_ids: Vec<UserId> = self
                    .accessible_users(principal)
                    .await?
                    .iter()
                    .map(|user| user.id)
                    .collect();

                if user_ids.is_empty() {
                    BTreeSet::new()
                } else {
                    self.memberships.list_entity_ids_for_users(&user_ids).await?
                }
            }
        };

        debug!(
            user_id = %principal.user_id(),
            role = %principal.role(),
            entity_count = entity_ids.len(),
            "resolved accessible entities"
        );

        Ok(entity_ids)
    }
}
