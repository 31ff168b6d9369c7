use super::*;

impl PostgresWorkspaceStore {
    async fn load_users(
        &self,
        sql: &str,
        entity_ids: Option<Vec<i64>>,
    ) -> AppResult<Vec<UserAccount>> {
        let mut query = sqlx::query_as::<_, UserRow>(sql);
        if let Some(entity_ids) = entity_ids {
            query = query.bind(entity_ids);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|error| read_error(error, "users"))?
            .into_iter()
            .map(UserAccount::try_from)
            .collect()
    }
}

#[async_trait]
impl MembershipRepository for PostgresWorkspaceStore {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| read_error(error, "user"))?
            .map(UserAccount::try_from)
            .transpose()
    }

    async fn list_all_entity_ids(&self) -> AppResult<BTreeSet<EntityId>> {
        let entity_ids = sqlx::query_scalar::<_, i64>("SELECT id FROM entities")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| read_error(error, "entity ids"))?;

        Ok(entity_ids.into_iter().map(EntityId::from_i64).collect())
    }

    async fn list_entity_ids_for_users(
        &self,
        user_ids: &[UserId],
    ) -> AppResult<BTreeSet<EntityId>> {
        let user_ids: Vec<i64> = user_ids.iter().map(|user_id| user_id.as_i64()).collect();
        let entity_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT entity_id
            FROM entity_user_memberships
            WHERE user_id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "entity memberships"))?;

        Ok(entity_ids.into_iter().map(EntityId::from_i64).collect())
    }

    async fn list_memberships_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<EntityMembership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, entity_id, user_id, created_at
            FROM entity_user_memberships
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| read_error(error, "entity memberships"))?;

        Ok(rows.into_iter().map(EntityMembership::from).collect())
    }

    async fn list_active_users(&self) -> AppResult<Vec<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE active ORDER BY id");
        self.load_users(&sql, None).await
    }

    async fn list_active_users_sharing_entities(
        &self,
        entity_ids: &BTreeSet<EntityId>,
    ) -> AppResult<Vec<UserAccount>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users u
            WHERE u.active
              AND u.role <> 'SUPERADMIN'
              AND EXISTS (
                SELECT 1
                FROM entity_user_memberships m
                WHERE m.user_id = u.id AND m.entity_id = ANY($1)
              )
            ORDER BY u.id
            "#
        );
        self.load_users(&sql, Some(entity_id_values(entity_ids))).await
    }
}

#[async_trait]
impl ResourceAnchorRepository for PostgresWorkspaceStore {
    async fn resolve_anchor(&self, resource: ResourceRef) -> AppResult<Option<ResourceAnchor>> {
        let layout = layout(resource.kind);
        let subject = resource.to_string();

        match layout.anchor {
            AnchorSql::Owner(owner_sql) => {
                let sql = format!("SELECT {owner_sql} FROM {} r WHERE r.id = $1", layout.table);
                let owner_id = sqlx::query_scalar::<_, i64>(&sql)
                    .bind(resource.id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|error| read_error(error, subject.as_str()))?;

                Ok(owner_id.map(|owner_id| ResourceAnchor::Owner(UserId::from_i64(owner_id))))
            }
            AnchorSql::Entities(fragment) => {
                let sql = format!(
                    "SELECT ARRAY(SELECT DISTINCT ecm.entity_id {fragment}) \
                     FROM {} r WHERE r.id = $1",
                    layout.table
                );
                let entity_ids = sqlx::query_scalar::<_, Vec<i64>>(&sql)
                    .bind(resource.id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|error| read_error(error, subject.as_str()))?;

                Ok(entity_ids.map(|entity_ids| {
                    ResourceAnchor::Entities(
                        entity_ids.into_iter().map(EntityId::from_i64).collect(),
                    )
                }))
            }
        }
    }
}
