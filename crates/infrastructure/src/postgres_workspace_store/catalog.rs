use super::*;

impl PostgresWorkspaceStore {
    async fn insert_link(&self, sql: &'static str, parent_id: i64, child_id: i64) -> AppResult<()> {
        sqlx::query(sql)
            .bind(parent_id)
            .bind(child_id)
            .execute(&self.pool)
            .await
            .map_err(|error| write_error(error, "catalog link"))?;

        Ok(())
    }

    async fn delete_link(
        &self,
        sql: &'static str,
        parent_id: i64,
        child_id: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(sql)
            .bind(parent_id)
            .bind(child_id)
            .execute(&self.pool)
            .await
            .map_err(|error| delete_error(error, "catalog link"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CatalogLinkRepository for PostgresWorkspaceStore {
    async fn link_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<()> {
        self.insert_link(
            r#"
            INSERT INTO context_navigation_links (context_id, navigation_id)
            VALUES ($1, $2)
            ON CONFLICT (context_id, navigation_id) DO NOTHING
            "#,
            context_id,
            navigation_id,
        )
        .await
    }

    async fn unlink_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<bool> {
        self.delete_link(
            r#"
            DELETE FROM context_navigation_links
            WHERE context_id = $1 AND navigation_id = $2
            "#,
            context_id,
            navigation_id,
        )
        .await
    }

    async fn link_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<()> {
        self.insert_link(
            r#"
            INSERT INTO navigation_general_query_links (navigation_id, general_query_id)
            VALUES ($1, $2)
            ON CONFLICT (navigation_id, general_query_id) DO NOTHING
            "#,
            navigation_id,
            query_id,
        )
        .await
    }

    async fn unlink_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<bool> {
        self.delete_link(
            r#"
            DELETE FROM navigation_general_query_links
            WHERE navigation_id = $1 AND general_query_id = $2
            "#,
            navigation_id,
            query_id,
        )
        .await
    }
}
