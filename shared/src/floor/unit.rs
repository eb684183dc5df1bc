//! Seatable units: tables and bars
//!
//! A unit hosts at most one open (non-`pagada`) account at a time,
//! referenced weakly by `current_account_id`. The `accounts` list is the
//! unit's append-only history; settled accounts stay in it.

use super::account::{Account, AccountStatus};
use super::geometry::{Orientation, Position, Size};
use serde::{Deserialize, Serialize};

/// Occupancy status of a table or bar
///
/// Wire strings are the historical Spanish values carried by persisted
/// layouts; do not rename them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UnitStatus {
    /// Free, eligible for a new account
    #[default]
    #[serde(rename = "libre")]
    Libre,
    /// Held for a reservation, no account yet
    #[serde(rename = "reservada")]
    Reservada,
    /// Seated with an open account
    #[serde(rename = "ocupada")]
    Ocupada,
    /// Check requested, awaiting settlement
    #[serde(rename = "por-pagar")]
    PorPagar,
}

/// Unit kind, used for addressing and selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Table,
    Bar,
}

/// A table on the floor plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableItem {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub status: UnitStatus,
    /// Append-only account history; at most one element is non-`pagada`
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Weak reference into `accounts`; absent when the table is free
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_account_id: Option<String>,
}

impl TableItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            status: UnitStatus::Libre,
            accounts: Vec::new(),
            current_account_id: None,
        }
    }
}

/// A bar counter on the floor plan
///
/// Same occupancy model as a table; `orientation` and `size` exist for
/// rendering only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarItem {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub size: Size,
    pub orientation: Orientation,
    pub status: UnitStatus,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_account_id: Option<String>,
}

impl BarItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: Position,
        size: Size,
        orientation: Orientation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            size,
            orientation,
            status: UnitStatus::Libre,
            accounts: Vec::new(),
            current_account_id: None,
        }
    }
}

/// Uniform accessor seam over tables and bars
///
/// The occupancy state machine and the aggregator operate on
/// `dyn Seatable` so per-kind logic is never duplicated.
pub trait Seatable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn kind(&self) -> UnitKind;
    fn status(&self) -> UnitStatus;
    fn set_status(&mut self, status: UnitStatus);
    fn accounts(&self) -> &[Account];
    fn accounts_mut(&mut self) -> &mut Vec<Account>;
    fn current_account_id(&self) -> Option<&str>;
    fn set_current_account_id(&mut self, account_id: Option<String>);

    /// The current (non-settled) account, if any
    fn current_account(&self) -> Option<&Account> {
        let id = self.current_account_id()?;
        self.accounts().iter().find(|a| a.id == id)
    }

    /// Look up any account in the unit's history
    fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts().iter().find(|a| a.id == account_id)
    }

    /// Whether any non-`pagada` account exists in the history
    fn has_open_account(&self) -> bool {
        self.accounts()
            .iter()
            .any(|a| a.status != AccountStatus::Pagada)
    }
}

impl Seatable for TableItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> UnitKind {
        UnitKind::Table
    }
    fn status(&self) -> UnitStatus {
        self.status
    }
    fn set_status(&mut self, status: UnitStatus) {
        self.status = status;
    }
    fn accounts(&self) -> &[Account] {
        &self.accounts
    }
    fn accounts_mut(&mut self) -> &mut Vec<Account> {
        &mut self.accounts
    }
    fn current_account_id(&self) -> Option<&str> {
        self.current_account_id.as_deref()
    }
    fn set_current_account_id(&mut self, account_id: Option<String>) {
        self.current_account_id = account_id;
    }
}

impl Seatable for BarItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn kind(&self) -> UnitKind {
        UnitKind::Bar
    }
    fn status(&self) -> UnitStatus {
        self.status
    }
    fn set_status(&mut self, status: UnitStatus) {
        self.status = status;
    }
    fn accounts(&self) -> &[Account] {
        &self.accounts
    }
    fn accounts_mut(&mut self) -> &mut Vec<Account> {
        &mut self.accounts
    }
    fn current_account_id(&self) -> Option<&str> {
        self.current_account_id.as_deref()
    }
    fn set_current_account_id(&mut self, account_id: Option<String>) {
        self.current_account_id = account_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_unit_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&UnitStatus::PorPagar).unwrap(),
            "\"por-pagar\""
        );
        let parsed: UnitStatus = serde_json::from_str("\"reservada\"").unwrap();
        assert_eq!(parsed, UnitStatus::Reservada);
    }

    #[test]
    fn test_current_account_lookup() {
        let mut table = TableItem::new("table-1", "Mesa 1", Position::new(0.0, 0.0));
        assert!(table.current_account().is_none());

        let account = Account::open(Utc::now());
        let account_id = account.id.clone();
        table.accounts.push(account);
        table.current_account_id = Some(account_id.clone());

        assert_eq!(table.current_account().unwrap().id, account_id);
        assert!(table.has_open_account());
    }

    #[test]
    fn test_free_table_has_no_open_account() {
        let table = TableItem::new("table-1", "Mesa 1", Position::new(0.0, 0.0));
        assert_eq!(table.status, UnitStatus::Libre);
        assert!(!table.has_open_account());
    }
}
