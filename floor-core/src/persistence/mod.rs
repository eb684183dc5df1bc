//! Layout persistence
//!
//! Round-trips the in-memory layout to durable per-user storage. Load
//! failures of any kind degrade to "no saved layout" so the session can
//! start from the default seed; save failures are logged and surfaced as
//! non-fatal errors. The backing store is the source of truth across
//! devices, last-write-wins at save granularity.

pub mod backend;
pub mod codec;
pub mod save_worker;

pub use backend::{LayoutBackend, LayoutRow, MemoryLayoutBackend, RedbLayoutBackend, StorageError};
pub use save_worker::{SaveHandle, SaveRequest, SaveWorker};

use crate::error::{FloorError, FloorResult};
use shared::floor::Section;
use std::sync::Arc;

/// A successfully loaded and validated layout
#[derive(Debug, Clone)]
pub struct HydratedLayout {
    pub sections: Vec<Section>,
    pub table_counter: u64,
}

/// Load/save façade over an injected `LayoutBackend`
#[derive(Clone)]
pub struct PersistenceAdapter {
    backend: Arc<dyn LayoutBackend>,
}

impl PersistenceAdapter {
    pub fn new(backend: Arc<dyn LayoutBackend>) -> Self {
        Self { backend }
    }

    /// Fetch and decode the user's layout row, or `None` when absent.
    ///
    /// Transport faults and malformed payloads also return `None` after
    /// logging: a failed load must never block the session, the caller
    /// falls back to the default seed.
    pub async fn load_layout(&self, user_id: &str) -> Option<HydratedLayout> {
        match self.try_load(user_id).await {
            Ok(layout) => layout,
            Err(FloorError::Serialization(msg)) => {
                tracing::error!(user_id = %user_id, error = %msg, "Persisted layout is malformed, treating as absent");
                None
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Layout load failed, falling back to default");
                None
            }
        }
    }

    /// Fetch and decode, propagating faults (for tests and diagnostics)
    pub async fn try_load(&self, user_id: &str) -> FloorResult<Option<HydratedLayout>> {
        let Some(row) = self.backend.fetch(user_id).await? else {
            return Ok(None);
        };
        let (sections, table_counter) = codec::decode_row(row)?;
        Ok(Some(HydratedLayout {
            sections,
            table_counter,
        }))
    }

    /// Serialize and upsert the user's single layout row.
    ///
    /// Errors are logged here and surfaced to the caller as non-fatal:
    /// the session continues on in-memory state.
    pub async fn save_layout(
        &self,
        user_id: &str,
        sections: &[Section],
        table_counter: u64,
    ) -> FloorResult<()> {
        let row = codec::encode_row(sections, table_counter)?;
        if let Err(e) = self.backend.upsert(user_id, row).await {
            tracing::error!(user_id = %user_id, error = %e, "Layout save failed");
            return Err(FloorError::Persistence(e));
        }
        tracing::debug!(user_id = %user_id, section_count = sections.len(), "Layout saved");
        Ok(())
    }
}
