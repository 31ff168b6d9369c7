use super::*;

#[async_trait]
impl UserRepository for PostgresWorkspaceStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| read_error(error, "user"))?
            .map(UserAccount::try_from)
            .transpose()
    }

    async fn create_user(
        &self,
        draft: UserDraft,
        home_entity: Option<EntityId>,
    ) -> AppResult<UserAccount> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let sql = format!(
            r#"
            INSERT INTO users (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(draft.name())
            .bind(draft.email().as_str())
            .bind(draft.role().as_str())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                write_error(
                    error,
                    format!("user with email '{}'", draft.email().as_str()).as_str(),
                )
            })?;
        let user = UserAccount::try_from(row)?;

        if let Some(entity_id) = home_entity {
            sqlx::query(
                r#"
                INSERT INTO entity_user_memberships (entity_id, user_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(entity_id.as_i64())
            .bind(user.id.as_i64())
            .execute(&mut *transaction)
            .await
            .map_err(|error| write_error(error, "entity membership"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(user)
    }

    async fn set_user_active(
        &self,
        user_id: UserId,
        active: bool,
    ) -> AppResult<Option<UserAccount>> {
        let sql = format!(
            r#"
            UPDATE users
            SET active = $2
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_i64())
            .bind(active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| write_error(error, format!("user {user_id}").as_str()))?
            .map(UserAccount::try_from)
            .transpose()
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| delete_error(error, format!("user {user_id}").as_str()))?;

        Ok(result.rows_affected() > 0)
    }
}
