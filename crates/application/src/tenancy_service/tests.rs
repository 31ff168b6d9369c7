use std::collections::BTreeSet;
use std::sync::Arc;

use insightdeck_core::{AppError, EntityId, Role, UserId};
use insightdeck_domain::{EntityDraft, TenantSelection};

use crate::test_support::FakeDirectory;

use super::TenancyService;

fn service(directory: &Arc<FakeDirectory>) -> TenancyService {
    TenancyService::new(directory.access(), directory.clone(), directory.clone())
}

fn draft(name: &str) -> EntityDraft {
    EntityDraft::new(name, Some("  ".to_owned())).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn entity_administration_is_super_admin_only() {
    let directory = FakeDirectory::shared();
    let root = directory.seed_user("root@example.com", Role::SuperAdmin).await;
    let admin = directory.seed_user("admin@example.com", Role::Admin).await;
    let service = service(&directory);

    assert!(matches!(
        service.create_entity(&admin, draft("Acme")).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.list_entities(&admin, None).await,
        Err(AppError::Forbidden(_))
    ));

    let created = service
        .create_entity(&root, draft("Acme"))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(created.description, None);
    assert!(matches!(
        service.create_entity(&root, draft("Acme")).await,
        Err(AppError::Conflict(_))
    ));

    let renamed = service.update_entity(&root, created.id, draft("Acme Ltd")).await;
    assert_eq!(renamed.map(|entity| entity.name).ok(), Some("Acme Ltd".to_owned()));
    assert_eq!(service.count_entities(&root).await.ok(), Some(1));

    assert!(service.delete_entity(&root, created.id).await.is_ok());
    assert!(matches!(
        service.get_entity(&root, created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn membership_changes_apply_to_next_resolution() {
    let directory = FakeDirectory::shared();
    let root = directory.seed_user("root@example.com", Role::SuperAdmin).await;
    let admin = directory.seed_user("admin@example.com", Role::Admin).await;
    let entity_id = directory.seed_entity("Acme", &[]).await;
    let service = service(&directory);
    let access = directory.access();

    assert!(
        access
            .accessible_entity_ids(&admin, None)
            .await
            .unwrap_or_default()
            .is_empty()
    );

    let first = service.add_member(&root, entity_id, admin.user_id()).await;
    let second = service.add_member(&root, entity_id, admin.user_id()).await;
    assert!(first.is_ok());
    assert_eq!(first.ok(), second.ok());
    assert_eq!(
        access.accessible_entity_ids(&admin, None).await.ok(),
        Some(BTreeSet::from([entity_id]))
    );

    assert!(service.remove_member(&root, entity_id, admin.user_id()).await.is_ok());
    assert!(matches!(
        service.remove_member(&root, entity_id, admin.user_id()).await,
        Err(AppError::NotFound(_))
    ));
    assert!(
        access
            .accessible_entity_ids(&admin, None)
            .await
            .unwrap_or_default()
            .is_empty()
    );
}

#[tokio::test]
async fn context_links_require_existing_entity_and_context() {
    let directory = FakeDirectory::shared();
    let root = directory.seed_user("root@example.com", Role::SuperAdmin).await;
    let entity_id = directory.seed_entity("Acme", &[]).await;
    directory.seed_context(40).await;
    let service = service(&directory);

    assert!(matches!(
        service.link_context(&root, entity_id, 41).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.link_context(&root, EntityId::from_i64(999), 40).await,
        Err(AppError::NotFound(_))
    ));

    assert!(service.link_context(&root, entity_id, 40).await.is_ok());
    assert_eq!(
        directory.context_entity_ids(40).await,
        BTreeSet::from([entity_id])
    );

    assert!(service.unlink_context(&root, entity_id, 40).await.is_ok());
    assert!(matches!(
        service.unlink_context(&root, entity_id, 40).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn user_entities_follow_the_target_role() {
    let directory = FakeDirectory::shared();
    let root = directory.seed_user("root@example.com", Role::SuperAdmin).await;
    let user = directory.seed_user("user@example.com", Role::User).await;
    let other = directory.seed_user("other@example.com", Role::User).await;
    let home = directory.seed_entity("Home", &[&user]).await;
    directory.seed_entity("Second", &[&user]).await;
    directory.seed_entity("Third", &[]).await;
    let service = service(&directory);

    let for_user = service
        .user_entities(&root, user.user_id())
        .await
        .unwrap_or_default();
    assert_eq!(
        for_user.iter().map(|entity| entity.id).collect::<Vec<_>>(),
        vec![home]
    );

    let for_root = service.user_entities(&root, root.user_id()).await;
    assert_eq!(for_root.map(|entities| entities.len()).ok(), Some(3));

    assert!(matches!(
        service.user_entities(&root, UserId::from_i64(9999)).await,
        Err(AppError::NotFound(_))
    ));

    let own = service
        .user_entities(&user, user.user_id())
        .await
        .unwrap_or_default();
    assert_eq!(
        own.iter().map(|entity| entity.id).collect::<Vec<_>>(),
        vec![home]
    );

    assert!(matches!(
        service.user_entities(&user, other.user_id()).await,
        Err(AppError::Forbidden(_))
    ));
    let none = service.user_entities(&other, other.user_id()).await;
    assert_eq!(none.map(|entities| entities.is_empty()).ok(), Some(true));
}

#[tokio::test]
async fn select_entity_validates_the_switch() {
    let directory = FakeDirectory::shared();
    let root = directory.seed_user("root@example.com", Role::SuperAdmin).await;
    let admin = directory.seed_user("admin@example.com", Role::Admin).await;
    let entity_id = directory.seed_entity("Acme", &[&admin]).await;
    let service = service(&directory);

    assert_eq!(
        service.select_entity(&root, 0).await.ok(),
        Some(TenantSelection::AllEntities)
    );
    assert_eq!(
        service.select_entity(&root, entity_id.as_i64()).await.ok(),
        Some(TenantSelection::Entity(entity_id))
    );
    assert!(matches!(
        service.select_entity(&root, 999).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.select_entity(&root, -3).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service.select_entity(&admin, entity_id.as_i64()).await,
        Err(AppError::Forbidden(_))
    ));
}
