use super::*;

impl WorkspaceTables {
    fn require_row<T>(
        table: &BTreeMap<i64, T>,
        kind: ResourceKind,
        id: i64,
    ) -> AppResult<()> {
        if table.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "{} does not exist",
                ResourceRef::new(kind, id)
            )))
        }
    }
}

#[async_trait]
impl CatalogLinkRepository for InMemoryWorkspaceStore {
    async fn link_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        WorkspaceTables::require_row(&tables.contexts, ResourceKind::ContextTable, context_id)?;
        WorkspaceTables::require_row(&tables.navigations, ResourceKind::Navigation, navigation_id)?;

        tables.navigation_links.insert((context_id, navigation_id));
        Ok(())
    }

    async fn unlink_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .navigation_links
            .remove(&(context_id, navigation_id)))
    }

    async fn link_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        WorkspaceTables::require_row(&tables.navigations, ResourceKind::Navigation, navigation_id)?;
        WorkspaceTables::require_row(
            &tables.general_queries,
            ResourceKind::GeneralQuery,
            query_id,
        )?;

        tables.general_query_links.insert((navigation_id, query_id));
        Ok(())
    }

    async fn unlink_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .general_query_links
            .remove(&(navigation_id, query_id)))
    }
}
