//! Accounts (tabs) and their line items
//!
//! An `Account` is one open or settled check against a table or bar. Its
//! lifecycle is strictly forward: `abierta` → `en-consumo` →
//! `lista-para-cobrar` → `pagada` (terminal). Items are append-only while
//! the account accepts orders; corrections are compensating entries, never
//! edits in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account lifecycle status
///
/// Wire strings are the historical Spanish values carried by persisted
/// layouts; do not rename them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AccountStatus {
    /// Tab opened, no items yet
    #[default]
    #[serde(rename = "abierta")]
    Abierta,
    /// At least one item ordered
    #[serde(rename = "en-consumo")]
    EnConsumo,
    /// Check requested; item list frozen
    #[serde(rename = "lista-para-cobrar")]
    ListaParaCobrar,
    /// Settled; immutable, kept for history
    #[serde(rename = "pagada")]
    Pagada,
}

impl AccountStatus {
    /// Whether new items may still be appended
    pub fn accepts_items(&self) -> bool {
        matches!(self, AccountStatus::Abierta | AccountStatus::EnConsumo)
    }

    /// Whether the account is terminal
    pub fn is_terminal(&self) -> bool {
        *self == AccountStatus::Pagada
    }
}

/// One ordered line against an account
///
/// `product_name`, `unit_price` and `total` are snapshots taken at order
/// time; they survive later product renames or deletions. Immutable once
/// appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountItem {
    pub id: String,
    /// Denormalized product name snapshot, not a live reference
    pub product_name: String,
    /// Negative quantities are compensating entries
    pub quantity: i32,
    pub unit_price: f64,
    /// quantity × unit_price, snapshotted at order time
    pub total: f64,
    pub timestamp: DateTime<Utc>,
}

/// One tab/check opened against a seatable unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub status: AccountStatus,
    /// Set at creation, immutable afterwards
    pub opened_at: DateTime<Utc>,
    /// Stamped exactly once on settle. Serialized as an explicit `null`
    /// while absent so it can never be confused with a real instant.
    pub closed_at: Option<DateTime<Utc>>,
    pub items: Vec<AccountItem>,
    /// Always equals the recomputed sum of `items[].total`
    pub total: f64,
    /// Split-seat billing label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_label: Option<String>,
    /// Payment method recorded on settle ("cash", "card", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Account {
    /// Create a fresh open account
    pub fn open(opened_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: AccountStatus::Abierta,
            opened_at,
            closed_at: None,
            items: Vec::new(),
            total: 0.0,
            seat_label: None,
            payment_method: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == AccountStatus::Pagada
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::EnConsumo).unwrap(),
            "\"en-consumo\""
        );
        assert_eq!(
            serde_json::to_string(&AccountStatus::ListaParaCobrar).unwrap(),
            "\"lista-para-cobrar\""
        );
        let parsed: AccountStatus = serde_json::from_str("\"pagada\"").unwrap();
        assert_eq!(parsed, AccountStatus::Pagada);
    }

    #[test]
    fn test_absent_closed_at_serializes_as_null() {
        let account = Account::open(Utc::now());
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("closedAt").unwrap().is_null());
    }

    #[test]
    fn test_accepts_items() {
        assert!(AccountStatus::Abierta.accepts_items());
        assert!(AccountStatus::EnConsumo.accepts_items());
        assert!(!AccountStatus::ListaParaCobrar.accepts_items());
        assert!(!AccountStatus::Pagada.accepts_items());
    }
}
