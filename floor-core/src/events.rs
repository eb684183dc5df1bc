//! State-change notifications for the rendering layer
//!
//! The manager broadcasts a `FloorEvent` after every committed mutation.
//! Receivers (Tables/Orders/History tabs) re-read the store snapshot on
//! notification; events carry ids, not entity payloads. A lagging
//! receiver missing events is tolerated, the store is the source of
//! truth.

use shared::floor::UnitStatus;

/// Broadcast channel capacity. A session produces a handful of events per
/// interaction; 1024 absorbs bursts without lagging receivers in practice.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Notification emitted after a committed layout mutation
#[derive(Debug, Clone, PartialEq)]
pub enum FloorEvent {
    /// Layout loaded from storage (or seeded) and installed in the store
    LayoutHydrated { section_count: usize },
    /// A structural edit (add/move/resize/remove) touched a section
    SectionMutated { section_id: String },
    /// A unit changed occupancy status
    UnitStatusChanged {
        unit_id: String,
        status: UnitStatus,
    },
    /// A new account was opened on a unit
    AccountOpened {
        unit_id: String,
        account_id: String,
    },
    /// Items were appended to an account
    ItemsAdded {
        unit_id: String,
        account_id: String,
        account_total: f64,
    },
    /// The check was requested; the account is frozen
    CheckRequested {
        unit_id: String,
        account_id: String,
    },
    /// The account was settled and the unit freed
    AccountSettled {
        unit_id: String,
        account_id: String,
        payment_method: String,
    },
}
