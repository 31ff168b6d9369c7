use async_trait::async_trait;
use insightdeck_core::AppResult;

/// Port for context/navigation and navigation/general-query links.
#[async_trait]
pub trait CatalogLinkRepository: Send + Sync {
    /// Links a navigation to a context table. Linking twice is a no-op.
    async fn link_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<()>;

    /// Removes a context/navigation link, returns whether it existed.
    async fn unlink_navigation(&self, context_id: i64, navigation_id: i64) -> AppResult<bool>;

    /// Links a general query to a navigation. Linking twice is a no-op.
    async fn link_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<()>;

    /// Removes a navigation/general-query link, returns whether it existed.
    async fn unlink_general_query(&self, navigation_id: i64, query_id: i64) -> AppResult<bool>;
}
