//! Strict (de)serialization boundary for the layout tree
//!
//! The single place where untyped storage payloads become typed entities
//! and back. Timestamps (`openedAt`, `closedAt`, item `timestamp`) convert
//! between in-memory instants and canonical ISO-8601 strings through
//! chrono's serde support, recursively for every account nested inside
//! every table and bar inside every section. An absent `closedAt` is an
//! explicit JSON `null`, never a default instant.
//!
//! Decoding validates structural invariants and rejects malformed rows
//! into `FloorError::Serialization`; callers treat the offending layout as
//! absent rather than crashing the session.

use crate::error::{FloorError, FloorResult};
use crate::persistence::backend::LayoutRow;
use shared::floor::{AccountStatus, Seatable, Section, UnitStatus};

/// Encode the typed section tree into the persisted row shape
pub fn encode_row(sections: &[Section], table_counter: u64) -> FloorResult<LayoutRow> {
    Ok(LayoutRow {
        sections: serde_json::to_value(sections)?,
        table_counter,
    })
}

/// Decode and validate a persisted row back into the typed section tree
pub fn decode_row(row: LayoutRow) -> FloorResult<(Vec<Section>, u64)> {
    let sections: Vec<Section> = serde_json::from_value(row.sections)?;
    validate_sections(&sections)?;
    Ok((sections, row.table_counter))
}

/// Structural invariants every hydrated layout must satisfy
fn validate_sections(sections: &[Section]) -> FloorResult<()> {
    for section in sections {
        for unit in section.units() {
            validate_unit(unit)?;
        }
    }
    Ok(())
}

fn validate_unit(unit: &dyn Seatable) -> FloorResult<()> {
    let open_count = unit
        .accounts()
        .iter()
        .filter(|a| a.status != AccountStatus::Pagada)
        .count();
    if open_count > 1 {
        return Err(FloorError::Serialization(format!(
            "unit {} has {} non-settled accounts, at most one is allowed",
            unit.id(),
            open_count
        )));
    }

    if let Some(current_id) = unit.current_account_id() {
        let Some(current) = unit.account(current_id) else {
            return Err(FloorError::Serialization(format!(
                "unit {} references missing account {}",
                unit.id(),
                current_id
            )));
        };
        if current.status == AccountStatus::Pagada {
            return Err(FloorError::Serialization(format!(
                "unit {} has settled account {} marked current",
                unit.id(),
                current_id
            )));
        }
    }

    if unit.status() == UnitStatus::Libre
        && (unit.current_account_id().is_some() || open_count > 0)
    {
        return Err(FloorError::Serialization(format!(
            "free unit {} still carries an open account",
            unit.id()
        )));
    }

    for account in unit.accounts() {
        if account.status == AccountStatus::Pagada && account.closed_at.is_none() {
            return Err(FloorError::Serialization(format!(
                "settled account {} is missing closedAt",
                account.id
            )));
        }
    }

    Ok(())
}
