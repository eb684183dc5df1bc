//! Floor plan entity model
//!
//! Ownership is strictly hierarchical: a `Section` owns its tables and
//! bars, a unit owns its `Account`s, an account owns its `AccountItem`s.
//! Nothing is shared between owners and there are no cycles, so the whole
//! tree serializes as one JSON document (the persisted layout row).

pub mod account;
pub mod geometry;
pub mod section;
pub mod unit;

// Re-exports
pub use account::{Account, AccountItem, AccountStatus};
pub use geometry::{Orientation, Position, Size};
pub use section::Section;
pub use unit::{BarItem, Seatable, TableItem, UnitKind, UnitStatus};
