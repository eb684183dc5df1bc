//! In-memory layout ownership
//!
//! The `LayoutStore` is the single source of truth for occupancy during a
//! session. It is an owned object, not ambient state: the manager holds
//! it, the persistence adapter hydrates and snapshots it.

pub mod seed;
pub mod store;

pub use seed::{SEED_TABLE_COUNTER, default_layout};
pub use store::LayoutStore;
