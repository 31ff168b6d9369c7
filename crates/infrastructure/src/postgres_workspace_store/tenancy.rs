use super::*;

#[async_trait]
impl EntityRepository for PostgresWorkspaceStore {
    async fn list_entities(&self, page: Option<PageRequest>) -> AppResult<Vec<Entity>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, description, created_at FROM entities ORDER BY id");
        push_page(&mut builder, page);

        let rows = builder
            .build_query_as::<EntityRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| read_error(error, "entities"))?;

        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn count_entities(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entities")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count entities: {error}")))
    }

    async fn find_entity(&self, entity_id: EntityId) -> AppResult<Option<Entity>> {
        let row = sqlx::query_as::<_, EntityRow>(
            r#"
            SELECT id, name, description, created_at
            FROM entities
            WHERE id = $1
            "#,
        )
        .bind(entity_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| read_error(error, "entity"))?;

        Ok(row.map(Entity::from))
    }

    async fn create_entity(&self, draft: EntityDraft) -> AppResult<Entity> {
        let row = sqlx::query_as::<_, EntityRow>(
            r#"
            INSERT INTO entities (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| write_error(error, format!("entity '{}'", draft.name()).as_str()))?;

        Ok(row.into())
    }

    async fn update_entity(
        &self,
        entity_id: EntityId,
        draft: EntityDraft,
    ) -> AppResult<Option<Entity>> {
        let row = sqlx::query_as::<_, EntityRow>(
            r#"
            UPDATE entities
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(draft.name())
        .bind(draft.description())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| write_error(error, format!("entity '{}'", draft.name()).as_str()))?;

        Ok(row.map(Entity::from))
    }

    async fn delete_entity(&self, entity_id: EntityId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM entities WHERE id = $1")
            .bind(entity_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| delete_error(error, format!("entity {entity_id}").as_str()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_membership(
        &self,
        entity_id: EntityId,
        user_id: UserId,
    ) -> AppResult<EntityMembership> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO entity_user_memberships (entity_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (entity_id, user_id) DO NOTHING
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| write_error(error, "entity membership"))?;

        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT id, entity_id, user_id, created_at
            FROM entity_user_memberships
            WHERE entity_id = $1 AND user_id = $2
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| read_error(error, "entity membership"))?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(row.into())
    }

    async fn remove_membership(&self, entity_id: EntityId, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM entity_user_memberships
            WHERE entity_id = $1 AND user_id = $2
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| delete_error(error, "entity membership"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn link_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entity_context_memberships (entity_id, context_id)
            VALUES ($1, $2)
            ON CONFLICT (entity_id, context_id) DO NOTHING
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(context_id)
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, "entity context link"))?;

        Ok(())
    }

    async fn unlink_context(&self, entity_id: EntityId, context_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM entity_context_memberships
            WHERE entity_id = $1 AND context_id = $2
            "#,
        )
        .bind(entity_id.as_i64())
        .bind(context_id)
        .execute(&self.pool)
        .await
        .map_err(|error| delete_error(error, "entity context link"))?;

        Ok(result.rows_affected() > 0)
    }
}
