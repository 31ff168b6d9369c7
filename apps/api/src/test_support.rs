use std::sync::Arc;

use insightdeck_application::{EntityRepository, UserRepository};
use insightdeck_core::{EntityId, Principal};
use insightdeck_domain::{EntityDraft, UserDraft};
use insightdeck_infrastructure::InMemoryWorkspaceStore;

use crate::api_config::{ApiConfig, StorageBackend};
use crate::api_services::build_app_state;
use crate::state::AppState;

pub const BOOTSTRAP_TOKEN: &str = "bootstrap-token";

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryWorkspaceStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryWorkspaceStore::new());
        let state = build_app_state(store.clone(), &test_config());
        Self { state, store }
    }

    pub async fn user(&self, email: &str, role: &str) -> Principal {
        let draft = UserDraft::new(email, email, role).unwrap_or_else(|_| unreachable!());
        self.store
            .create_user(draft, None)
            .await
            .map(|user| user.principal())
            .unwrap_or_else(|_| unreachable!())
    }

    pub async fn entity(&self, name: &str, members: &[Principal]) -> EntityId {
        let draft = EntityDraft::new(name, None).unwrap_or_else(|_| unreachable!());
        let entity_id = self
            .store
            .create_entity(draft)
            .await
            .map(|entity| entity.id)
            .unwrap_or_else(|_| unreachable!());

        for member in members {
            let joined = self
                .store
                .add_membership(entity_id, member.user_id())
                .await;
            assert!(joined.is_ok());
        }

        entity_id
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        migrate_only: false,
        storage_backend: StorageBackend::Memory,
        database_url: None,
        frontend_url: "http://localhost:3000".to_owned(),
        bootstrap_token: BOOTSTRAP_TOKEN.to_owned(),
        api_host: "127.0.0.1".to_owned(),
        api_port: 3001,
        cookie_secure: false,
        seed_super_admin: None,
    }
}
