mod common;

use attini::models::campaign::{Campaign, CampaignStatus, NewCampaign, UpdateCampaign};
use attini::remote::memory::Operation;
use attini::store::{ResourceStore, SyncPolicy};
use serde_json::json;
use uuid::Uuid;

fn new_campaign(title: &str) -> NewCampaign {
    NewCampaign {
        title: title.to_string(),
        description: "Lançamento de verão".to_string(),
        cover_image: None,
        status: CampaignStatus::Active,
        show_graphic_assets: true,
        show_spot_requests: true,
        show_material: true,
    }
}

// ============================================================================
// LIST
// ============================================================================

#[tokio::test]
async fn test_list_only_returns_owner_rows_newest_first() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let bia = common::owner_for(&svc, "bia@example.com").await;
    common::seed_campaign(&svc, &ana, "Primeira", [true; 3]);
    common::seed_campaign(&svc, &bia, "De outra pessoa", [true; 3]);
    common::seed_campaign(&svc, &ana, "Segunda", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana);
    let titles: Vec<String> = store.list().await.iter().map(|c| c.title.clone()).collect();

    assert_eq!(titles, vec!["Segunda", "Primeira"]);
    assert!(!store.is_loading());
    assert!(store.toasts().is_empty());
}

#[tokio::test]
async fn test_failed_list_keeps_previous_mirror() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    common::seed_campaign(&svc, &ana, "Primeira", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana);
    store.list().await;
    svc.fail_after(Operation::Select, 0);
    store.list().await;

    assert_eq!(store.rows().len(), 1);
    let toasts = store.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].is_error());
    assert_eq!(toasts[0].title, "Erro ao carregar campanhas");
    assert!(!store.is_loading());
}

// ============================================================================
// CREATE / UPDATE / DELETE
// ============================================================================

#[tokio::test]
async fn test_create_puts_row_at_head_once() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    common::seed_campaign(&svc, &ana, "Antiga", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana.clone());
    store.list().await;
    let created = store.create(&new_campaign("Nova")).await.expect("create succeeds");

    assert_eq!(store.rows()[0].id, created.id);
    assert_eq!(store.rows().iter().filter(|c| c.id == created.id).count(), 1);
    assert_eq!(created.user_id, ana.user_id);

    let toasts = store.take_toasts();
    assert_eq!(toasts[0].title, "Campanha criada!");
    assert!(toasts[0].description.contains("\"Nova\""));
}

#[tokio::test]
async fn test_failed_create_leaves_mirror_untouched() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana);
    store.list().await;

    svc.fail_after(Operation::Insert, 0);
    assert!(store.create(&new_campaign("Nova")).await.is_none());
    assert!(store.rows().is_empty());
    assert!(store.take_toasts()[0].is_error());
}

#[tokio::test]
async fn test_update_never_moves_identity_columns() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let id = common::seed_campaign(&svc, &ana, "Original", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana.clone());
    store.list().await;
    let updated = store
        .update_value(id, json!({ "id": Uuid::new_v4(), "user_id": Uuid::new_v4(), "title": "Renomeada" }))
        .await
        .expect("update succeeds");

    assert_eq!(updated.id, id);
    assert_eq!(updated.user_id, ana.user_id);
    assert_eq!(updated.title, "Renomeada");
    assert_eq!(store.find(id).map(|c| c.title.as_str()), Some("Renomeada"));
}

#[tokio::test]
async fn test_empty_patch_sends_nothing() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let id = common::seed_campaign(&svc, &ana, "Original", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana);
    assert!(store.update(id, &UpdateCampaign::default()).await.is_none());
    assert_eq!(svc.calls(Operation::Update), 0);
    assert!(store.toasts().is_empty());
}

#[tokio::test]
async fn test_other_owner_cannot_update() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let bia = common::owner_for(&svc, "bia@example.com").await;
    let id = common::seed_campaign(&svc, &ana, "Da Ana", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), bia);
    let patch = UpdateCampaign { title: Some("Invadida".into()), ..Default::default() };
    assert!(store.update(id, &patch).await.is_none());
    assert_eq!(svc.rows("campaigns")[0]["title"], "Da Ana");
}

#[tokio::test]
async fn test_delete_removes_row_from_mirror() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let id = common::seed_campaign(&svc, &ana, "Some", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana);
    store.list().await;
    assert!(store.delete(id).await);
    assert!(store.find(id).is_none());
    assert!(svc.rows("campaigns").is_empty());
    assert_eq!(store.take_toasts()[0].title, "Campanha excluída!");
}

// ============================================================================
// SYNC POLICY
// ============================================================================

#[tokio::test]
async fn test_refetch_policy_matches_merge_result() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    common::seed_campaign(&svc, &ana, "Antiga", [true; 3]);

    let mut merge: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana.clone());
    merge.list().await;
    let created = merge.create(&new_campaign("Nova")).await.expect("create succeeds");

    let mut refetch: ResourceStore<Campaign> =
        ResourceStore::new(svc.clone(), ana).with_policy(SyncPolicy::Refetch);
    refetch.list().await;
    let selects_before = svc.calls(Operation::Select);
    refetch.delete(created.id).await;

    assert_eq!(svc.calls(Operation::Select), selects_before + 1);
    let titles: Vec<&str> = refetch.rows().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Antiga"]);
}

// ============================================================================
// SESSION EXPIRY
// ============================================================================

#[tokio::test]
async fn test_revoked_token_marks_session_expired() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    common::seed_campaign(&svc, &ana, "Primeira", [true; 3]);

    let mut store: ResourceStore<Campaign> = ResourceStore::new(svc.clone(), ana.clone());
    store.list().await;
    assert!(!store.session_expired());

    svc.revoke(&ana.access_token);
    store.list().await;
    assert!(store.session_expired());
    assert_eq!(store.rows().len(), 1);
}
