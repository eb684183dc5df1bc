use super::*;
use crate::layout::LayoutStore;
use shared::floor::Account;

fn create_test_manager() -> LayoutManager {
    LayoutManager::new("user-test", LayoutStore::seeded())
}

// ========================================================================
// Helper: seat a unit and order some lines
// ========================================================================

fn seat_with_items(manager: &mut LayoutManager, unit_id: &str, items: Vec<ItemInput>) -> String {
    let account_id = manager.seat_unit(unit_id).expect("Failed to seat unit");
    for input in items {
        manager
            .add_item(unit_id, &account_id, input)
            .expect("Failed to add item");
    }
    account_id
}

fn mojito(quantity: i32) -> ItemInput {
    ItemInput::new("Mojito", quantity, 8.5)
}

fn account_snapshot(manager: &LayoutManager, unit_id: &str, account_id: &str) -> Account {
    manager
        .store()
        .unit(unit_id)
        .expect("unit must exist")
        .account(account_id)
        .expect("account must exist")
        .clone()
}

fn assert_unit_status(manager: &LayoutManager, unit_id: &str, expected: UnitStatus) {
    let actual = manager.store().unit(unit_id).expect("unit must exist").status();
    assert_eq!(
        actual, expected,
        "Expected unit {} to be {:?}, got {:?}",
        unit_id, expected, actual
    );
}

fn assert_account_status(
    manager: &LayoutManager,
    unit_id: &str,
    account_id: &str,
    expected: AccountStatus,
) {
    let actual = account_snapshot(manager, unit_id, account_id).status;
    assert_eq!(
        actual, expected,
        "Expected account {} to be {:?}, got {:?}",
        account_id, expected, actual
    );
}

/// Every free unit must reference no account and own no open account,
/// regardless of the operation sequence that led here.
fn assert_free_units_carry_no_open_accounts(manager: &LayoutManager) {
    for section in manager.sections() {
        for unit in section.units() {
            if unit.status() == UnitStatus::Libre {
                assert!(
                    unit.current_account_id().is_none(),
                    "Free unit {} still references account {:?}",
                    unit.id(),
                    unit.current_account_id()
                );
                assert!(
                    !unit.has_open_account(),
                    "Free unit {} still has an open account",
                    unit.id()
                );
            }
        }
    }
}
