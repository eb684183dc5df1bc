//! Shared types for the Barflow floor engine
//!
//! Entity model for the floor plan: sections, seatable units
//! (tables/bars), accounts and their line items. No engine logic
//! lives here; `floor-core` owns the state machine.

pub mod floor;

// Re-exports
pub use floor::{
    Account, AccountItem, AccountStatus, BarItem, Orientation, Position, Seatable, Section, Size,
    TableItem, UnitKind, UnitStatus,
};
pub use serde::{Deserialize, Serialize};
