//! Background save worker
//!
//! Mutations enqueue full layout snapshots; the worker writes them out
//! without blocking the interaction flow. Saves are processed strictly in
//! issue order on one task, so a save in flight is never overtaken by an
//! older one, and queued snapshots are coalesced so only the newest per
//! user is written. Failures are logged and never fatal: the session keeps
//! running on in-memory state and the next mutation enqueues a fresh
//! snapshot. Dropping the handle lets in-flight saves finish in the
//! background.

use super::PersistenceAdapter;
use shared::floor::Section;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Queue depth. Snapshots are coalesced on receive, so the queue only
/// needs to absorb a burst of mutations between worker wakeups.
const SAVE_QUEUE_CAPACITY: usize = 256;

/// One queued layout snapshot
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub user_id: String,
    pub sections: Vec<Section>,
    pub table_counter: u64,
}

/// Sending half handed to the manager
#[derive(Clone)]
pub struct SaveHandle {
    tx: mpsc::Sender<SaveRequest>,
}

impl SaveHandle {
    /// Enqueue a snapshot without awaiting. If the queue is full the
    /// snapshot is dropped: the next mutation enqueues a newer one and
    /// persistence is last-write-wins anyway.
    pub fn enqueue(&self, request: SaveRequest) {
        match self.tx.try_send(request) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(req)) => {
                tracing::warn!(user_id = %req.user_id, "Save queue full, dropping snapshot");
            }
            Err(mpsc::error::TrySendError::Closed(req)) => {
                tracing::warn!(user_id = %req.user_id, "Save worker stopped, dropping snapshot");
            }
        }
    }
}

/// Worker that drains the save queue onto a persistence adapter
pub struct SaveWorker {
    adapter: PersistenceAdapter,
}

impl SaveWorker {
    pub fn new(adapter: PersistenceAdapter) -> Self {
        Self { adapter }
    }

    /// Spawn the worker task; returns the enqueue handle and the task
    pub fn spawn(self) -> (SaveHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(SAVE_QUEUE_CAPACITY);
        let task = tokio::spawn(self.run(rx));
        (SaveHandle { tx }, task)
    }

    async fn run(self, mut rx: mpsc::Receiver<SaveRequest>) {
        tracing::debug!("Save worker started");

        while let Some(first) = rx.recv().await {
            // Coalesce everything already queued: the channel is FIFO, so
            // the last snapshot seen per user is the newest issued.
            let mut latest: HashMap<String, SaveRequest> = HashMap::new();
            latest.insert(first.user_id.clone(), first);
            while let Ok(req) = rx.try_recv() {
                latest.insert(req.user_id.clone(), req);
            }

            for (user_id, req) in latest {
                if let Err(e) = self
                    .adapter
                    .save_layout(&user_id, &req.sections, req.table_counter)
                    .await
                {
                    tracing::error!(user_id = %user_id, error = %e, "Background save failed");
                }
            }
        }

        tracing::debug!("Save worker stopped");
    }
}
