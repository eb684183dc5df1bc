//! Pure status transition rules
//!
//! The single place that knows which unit and account transitions exist.
//! Operations in the manager validate against these predicates before
//! touching the store.
//!
//! Unit cycle: `libre` → `ocupada` | `reservada`; `reservada` → `ocupada`
//! (guest arrives) or back to `libre` (no-show); `ocupada` → `por-pagar`
//! (check requested); `por-pagar` → `libre` (settled).
//!
//! Account chain, strictly forward: `abierta` → `en-consumo` →
//! `lista-para-cobrar` → `pagada`.

use shared::floor::{AccountStatus, UnitStatus};

/// Whether a unit may move from `from` to `to`
pub fn unit_transition_allowed(from: UnitStatus, to: UnitStatus) -> bool {
    use UnitStatus::*;
    matches!(
        (from, to),
        (Libre, Ocupada)
            | (Libre, Reservada)
            | (Reservada, Ocupada)
            | (Reservada, Libre)
            | (Ocupada, PorPagar)
            | (PorPagar, Libre)
    )
}

/// Whether an account may move from `from` to `to` (forward only, one
/// step at a time except `abierta` → `lista-para-cobrar`, the empty-tab
/// check request)
pub fn account_transition_allowed(from: AccountStatus, to: AccountStatus) -> bool {
    use AccountStatus::*;
    matches!(
        (from, to),
        (Abierta, EnConsumo)
            | (Abierta, ListaParaCobrar)
            | (EnConsumo, ListaParaCobrar)
            | (ListaParaCobrar, Pagada)
    )
}
