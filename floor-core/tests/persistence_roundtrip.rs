//! End-to-end persistence tests against a real redb file
//!
//! Drives a full service cycle through the manager, writes the layout to
//! disk and rehydrates it in a fresh session, as happens when staff sign
//! in on another device.

use std::sync::Arc;

use floor_core::{ItemInput, LayoutManager, PersistenceAdapter, RedbLayoutBackend};
use shared::floor::{AccountStatus, UnitStatus};

fn adapter_for(path: &std::path::Path) -> PersistenceAdapter {
    let backend = RedbLayoutBackend::open(path).expect("Failed to open redb database");
    PersistenceAdapter::new(Arc::new(backend))
}

#[tokio::test]
async fn test_layout_round_trips_through_redb() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("layouts.redb");

    // First session: serve one table fully, leave the bar mid-service
    {
        let mut manager = LayoutManager::hydrate("user-1", adapter_for(&db_path)).await;

        let settled = manager.seat_unit("table-1").unwrap();
        manager
            .add_item("table-1", &settled, ItemInput::new("Mojito", 2, 8.5))
            .unwrap();
        manager.request_check(&settled).unwrap();
        manager.settle_account(&settled, "card").unwrap();

        let open = manager.seat_unit("bar-1").unwrap();
        manager
            .add_item("bar-1", &open, ItemInput::new("Vermut", 1, 4.0))
            .unwrap();

        manager.reserve_unit("table-7").unwrap();
        manager.save_now().await.unwrap();
    }

    // Second session: everything is back, timestamps intact
    let manager = LayoutManager::hydrate("user-1", adapter_for(&db_path)).await;

    let table = manager.store().unit("table-1").unwrap();
    assert_eq!(table.status(), UnitStatus::Libre);
    assert!(table.current_account_id().is_none());
    let history = &table.accounts()[0];
    assert_eq!(history.status, AccountStatus::Pagada);
    assert_eq!(history.total, 17.0);
    assert_eq!(history.payment_method.as_deref(), Some("card"));
    assert!(history.closed_at.is_some());
    assert!(history.closed_at.unwrap() > history.opened_at);

    let bar = manager.store().unit("bar-1").unwrap();
    assert_eq!(bar.status(), UnitStatus::Ocupada);
    let open = bar.current_account().unwrap();
    assert_eq!(open.status, AccountStatus::EnConsumo);
    assert_eq!(open.total, 4.0);
    // Never settled, so never closed
    assert!(open.closed_at.is_none());

    assert_eq!(
        manager.store().unit("table-7").unwrap().status(),
        UnitStatus::Reservada
    );
}

#[tokio::test]
async fn test_structural_edits_round_trip_through_redb() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("layouts.redb");

    {
        let mut manager = LayoutManager::hydrate("user-1", adapter_for(&db_path)).await;
        let table_id = manager
            .add_table("section-1", shared::floor::Position { x: 500.0, y: 500.0 })
            .unwrap();
        assert_eq!(table_id, "table-13");
        manager.remove_unit("section-1", "table-2").unwrap();
        manager.save_now().await.unwrap();
    }

    let manager = LayoutManager::hydrate("user-1", adapter_for(&db_path)).await;
    assert!(manager.store().unit("table-13").is_some());
    assert!(manager.store().unit("table-2").is_none());
    // Counter resumes where it left off, no id reuse after reload
    assert_eq!(manager.store().table_counter(), 14);
}

#[tokio::test]
async fn test_layouts_are_isolated_per_user() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("layouts.redb");

    {
        let mut manager = LayoutManager::hydrate("user-1", adapter_for(&db_path)).await;
        manager.seat_unit("table-1").unwrap();
        manager.save_now().await.unwrap();
    }

    // A different user on the same database starts from the seed
    let other = LayoutManager::hydrate("user-2", adapter_for(&db_path)).await;
    assert_eq!(
        other.store().unit("table-1").unwrap().status(),
        UnitStatus::Libre
    );
}
