//! Barflow floor engine
//!
//! Owns the in-memory floor plan for one staff session, enforces the
//! occupancy state machine for tables/bars and their accounts, derives
//! totals and history views, and round-trips the layout to durable
//! per-user storage.
//!
//! # Architecture
//!
//! ```text
//! LayoutManager (occupancy state machine, one per session)
//!     ├─ LayoutStore        in-memory sections, single source of truth
//!     ├─ PersistenceAdapter load/save over a LayoutBackend (redb | memory)
//!     ├─ SaveWorker         background, per-user serialized, coalescing
//!     ├─ SelectionController single focused unit for the UI
//!     └─ broadcast::Sender<FloorEvent> notifications for rendering
//! ```
//!
//! All mutations are synchronous and atomic-or-noop; persistence calls
//! are the only suspension points and never block the interaction flow.

pub mod aggregate;
pub mod error;
pub mod events;
pub mod layout;
pub mod manager;
pub mod money;
pub mod persistence;
pub mod selection;

// Re-exports
pub use aggregate::{
    UnitSummary, account_total, floor_summaries, history_for_period, open_accounts, unit_summary,
};
pub use error::{FloorError, FloorResult};
pub use events::FloorEvent;
pub use layout::{LayoutStore, default_layout};
pub use manager::{ItemInput, LayoutManager};
pub use persistence::{
    HydratedLayout, LayoutBackend, LayoutRow, MemoryLayoutBackend, PersistenceAdapter,
    RedbLayoutBackend, SaveWorker,
};
pub use selection::{Selection, SelectionController};
