use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use super::queue::{PendingWrites, Snapshot, WriterMessage};
use crate::storage::{Record, RecordStore, StoreError, WriteBatch};

/// Counters shared between the writer task and its handle
#[derive(Debug, Default)]
pub struct WriterCounters {
    writes_completed: AtomicU64,
    writes_failed: AtomicU64,
    snapshots_coalesced: AtomicU64,
    last_written_revision: AtomicU64,
}

/// Write-through statistics for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub persistent: bool,
    pub writes_completed: u64,
    pub writes_failed: u64,
    pub snapshots_coalesced: u64,
    pub last_written_revision: u64,
}

impl WriterCounters {
    pub fn status(&self, persistent: bool) -> SyncStatus {
        SyncStatus {
            persistent,
            writes_completed: self.writes_completed.load(Ordering::Relaxed),
            writes_failed: self.writes_failed.load(Ordering::Relaxed),
            snapshots_coalesced: self.snapshots_coalesced.load(Ordering::Relaxed),
            last_written_revision: self.last_written_revision.load(Ordering::Relaxed),
        }
    }
}

/// Build the clear + add-per-card batch for a snapshot
pub fn snapshot_batch(snapshot: &Snapshot) -> Result<WriteBatch, StoreError> {
    let mut batch = WriteBatch::new();
    batch.clear();
    for card in snapshot.cards.iter() {
        let record: Record = match serde_json::to_value(card)? {
            serde_json::Value::Object(map) => map,
            _ => return Err(StoreError::MissingKey),
        };
        batch.add(record);
    }
    Ok(batch)
}

/// Start the write-through task.
///
/// The task owns the store and handles one batch at a time, so two
/// write-throughs never overlap.
pub fn start_writer(
    store: Arc<dyn RecordStore>,
    counters: Arc<WriterCounters>,
) -> (mpsc::UnboundedSender<WriterMessage>, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        writer_loop(store, rx, counters).await;
    });

    (tx, handle)
}

async fn writer_loop(
    store: Arc<dyn RecordStore>,
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    counters: Arc<WriterCounters>,
) {
    while let Some(message) = rx.recv().await {
        let mut pending = PendingWrites::new();
        pending.push(message);
        while let Ok(message) = rx.try_recv() {
            pending.push(message);
        }

        counters
            .snapshots_coalesced
            .fetch_add(pending.coalesced(), Ordering::Relaxed);

        if let Some(snapshot) = pending.take_latest() {
            write_snapshot(store.as_ref(), &snapshot, &counters).await;
        }

        pending.complete_flushes();

        if pending.is_shutdown() {
            log::debug!("Write-through task for '{}' stopped", store.name());
            break;
        }
    }
}

async fn write_snapshot(store: &dyn RecordStore, snapshot: &Snapshot, counters: &WriterCounters) {
    let result = match snapshot_batch(snapshot) {
        Ok(batch) => store.write(batch).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            counters.writes_completed.fetch_add(1, Ordering::Relaxed);
            counters
                .last_written_revision
                .store(snapshot.revision, Ordering::Relaxed);
            log::debug!(
                "Wrote {} cards to '{}' (revision {})",
                snapshot.cards.len(),
                store.name(),
                snapshot.revision
            );
        }
        Err(e) => {
            counters.writes_failed.fetch_add(1, Ordering::Relaxed);
            log::error!(
                "Write-through of revision {} to '{}' failed: {}",
                snapshot.revision,
                store.name(),
                e
            );
        }
    }
}
