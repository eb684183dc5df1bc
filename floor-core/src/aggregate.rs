//! Read-side aggregation over the section tree
//!
//! Pure functions deriving the Orders and History views from the layout.
//! Nothing here mutates; totals shown to staff are recomputed from the
//! item lists rather than trusted from the stored field.

use chrono::{DateTime, Duration, Utc};
use shared::floor::{Account, AccountStatus, Seatable, Section, UnitStatus};

use crate::money;

/// Account total recomputed from its lines
pub fn account_total(account: &Account) -> f64 {
    money::items_total(&account.items)
}

/// One row of the Orders view
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    pub unit_id: String,
    pub unit_name: String,
    pub status: UnitStatus,
    /// Total of the current account, 0 when the unit has none
    pub current_total: f64,
    /// How long the current account has been open
    pub open_duration: Option<Duration>,
}

/// Summarize one unit for the Orders view
pub fn unit_summary(unit: &dyn Seatable, now: DateTime<Utc>) -> UnitSummary {
    let current = unit.current_account();
    UnitSummary {
        unit_id: unit.id().to_string(),
        unit_name: unit.name().to_string(),
        status: unit.status(),
        current_total: current.map(account_total).unwrap_or(0.0),
        open_duration: current.map(|a| now - a.opened_at),
    }
}

/// Orders view: every unit across the floor, section order preserved
pub fn floor_summaries(sections: &[Section], now: DateTime<Utc>) -> Vec<UnitSummary> {
    sections
        .iter()
        .flat_map(|section| section.units().map(move |unit| unit_summary(unit, now)))
        .collect()
}

/// All accounts currently being served, paired with their unit id
pub fn open_accounts(sections: &[Section]) -> Vec<(&str, &Account)> {
    sections
        .iter()
        .flat_map(|section| section.units())
        .filter_map(|unit| unit.current_account().map(|a| (unit.id(), a)))
        .collect()
}

/// History view: settled accounts closed within `[start, end)`, oldest
/// first. Accounts never move between units, so the unit trees are the
/// only source scanned.
pub fn history_for_period(
    sections: &[Section],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&Account> {
    let mut settled: Vec<&Account> = sections
        .iter()
        .flat_map(|section| section.units())
        .flat_map(|unit| unit.accounts().iter())
        .filter(|account| account.status == AccountStatus::Pagada)
        .filter(|account| {
            account
                .closed_at
                .is_some_and(|closed| closed >= start && closed < end)
        })
        .collect();
    settled.sort_by_key(|account| account.closed_at);
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_layout;
    use chrono::TimeZone;
    use shared::floor::AccountItem;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    fn settled_account(opened: DateTime<Utc>, closed: DateTime<Utc>, total: f64) -> Account {
        let mut account = Account::open(opened);
        account.items.push(AccountItem {
            id: uuid::Uuid::new_v4().to_string(),
            product_name: "Caña".to_string(),
            quantity: 1,
            unit_price: total,
            total,
            timestamp: opened,
        });
        account.total = total;
        account.status = AccountStatus::Pagada;
        account.closed_at = Some(closed);
        account.payment_method = Some("cash".to_string());
        account
    }

    #[test]
    fn test_summary_of_free_unit() {
        let sections = default_layout();
        let summary = unit_summary(&sections[0].tables[0], at(20, 0));

        assert_eq!(summary.status, UnitStatus::Libre);
        assert_eq!(summary.current_total, 0.0);
        assert!(summary.open_duration.is_none());
    }

    #[test]
    fn test_summary_of_occupied_unit() {
        let mut sections = default_layout();
        let mut account = Account::open(at(20, 0));
        account.items.push(AccountItem {
            id: "item-1".to_string(),
            product_name: "Mojito".to_string(),
            quantity: 2,
            unit_price: 8.5,
            total: 17.0,
            timestamp: at(20, 5),
        });
        let account_id = account.id.clone();
        {
            let table = &mut sections[0].tables[0];
            table.accounts.push(account);
            table.current_account_id = Some(account_id);
            table.status = UnitStatus::Ocupada;
        }

        let summary = unit_summary(&sections[0].tables[0], at(20, 45));
        assert_eq!(summary.status, UnitStatus::Ocupada);
        assert_eq!(summary.current_total, 17.0);
        assert_eq!(summary.open_duration, Some(Duration::minutes(45)));
    }

    #[test]
    fn test_floor_summaries_cover_every_unit() {
        let sections = default_layout();
        let summaries = floor_summaries(&sections, at(20, 0));
        // 12 tables and one bar in the seed
        assert_eq!(summaries.len(), 13);
        assert!(summaries.iter().all(|s| s.status == UnitStatus::Libre));
    }

    #[test]
    fn test_history_filters_by_closing_instant() {
        let mut sections = default_layout();
        sections[0].tables[0]
            .accounts
            .push(settled_account(at(18, 0), at(19, 0), 10.0));
        sections[0].tables[1]
            .accounts
            .push(settled_account(at(20, 0), at(21, 0), 20.0));
        sections[0].tables[2]
            .accounts
            .push(settled_account(at(22, 0), at(23, 30), 30.0));

        let history = history_for_period(&sections, at(19, 0), at(23, 0));
        let totals: Vec<f64> = history.iter().map(|a| account_total(a)).collect();

        // Start inclusive, end exclusive, oldest first
        assert_eq!(totals, vec![10.0, 20.0]);
    }

    #[test]
    fn test_history_ignores_open_accounts() {
        let mut sections = default_layout();
        let account = Account::open(at(20, 0));
        let account_id = account.id.clone();
        {
            let table = &mut sections[0].tables[0];
            table.accounts.push(account);
            table.current_account_id = Some(account_id);
            table.status = UnitStatus::Ocupada;
        }

        assert!(history_for_period(&sections, at(0, 0), at(23, 59)).is_empty());
        assert_eq!(open_accounts(&sections).len(), 1);
    }
}
