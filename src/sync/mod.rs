//! Keeps the durable card store in step with the in-memory collection
//!
//! - Startup: open the store (running the schema upgrade), read every record,
//!   and hand the decoded cards to the caller.
//! - Write-through: every new collection snapshot replaces the store contents.
//!   Snapshots go through a single writer task, so writes are serialized.
//!
//! If the store cannot be opened the synchronizer runs detached: the session
//! keeps working in memory and nothing survives a restart.

pub mod queue;
pub mod writer;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::flashcards::Card;
use crate::storage::migration::{CardUpgrade, CARD_SCHEMA_VERSION};
use crate::storage::{Record, StoreBackend};

pub use queue::{Snapshot, WriterMessage};
pub use writer::SyncStatus;
use writer::{start_writer, WriterCounters};

/// Handle to the write-through task
pub struct Synchronizer {
    sender: Option<mpsc::UnboundedSender<WriterMessage>>,
    handle: Option<JoinHandle<()>>,
    counters: Arc<WriterCounters>,
    persistent: bool,
}

impl Synchronizer {
    /// Open `store_name`, upgrade it if needed, and load every card.
    ///
    /// Storage failures are logged and yield a detached synchronizer with no cards.
    pub async fn start(
        backend: &dyn StoreBackend,
        store_name: &str,
        default_stack: &str,
    ) -> (Self, Vec<Card>) {
        let upgrade = CardUpgrade::new(default_stack);
        let store = match backend.open(store_name, CARD_SCHEMA_VERSION, &upgrade).await {
            Ok(store) => store,
            Err(e) => {
                log::warn!(
                    "Card store '{}' unavailable, changes will not be saved: {}",
                    store_name,
                    e
                );
                return (Self::detached(), Vec::new());
            }
        };

        let records = match store.get_all().await {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "Could not read card store '{}', changes will not be saved: {}",
                    store_name,
                    e
                );
                return (Self::detached(), Vec::new());
            }
        };

        let cards = decode_cards(records);
        log::info!("Loaded {} cards from '{}'", cards.len(), store_name);

        let counters = Arc::new(WriterCounters::default());
        let (sender, handle) = start_writer(store, Arc::clone(&counters));

        (
            Self {
                sender: Some(sender),
                handle: Some(handle),
                counters,
                persistent: true,
            },
            cards,
        )
    }

    /// A synchronizer that persists nothing
    pub fn detached() -> Self {
        Self {
            sender: None,
            handle: None,
            counters: Arc::new(WriterCounters::default()),
            persistent: false,
        }
    }

    /// Whether this synchronizer was started against a durable store
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Queue `cards` as the new durable contents. Returns immediately.
    pub fn write_through(&self, revision: u64, cards: Arc<Vec<Card>>) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender
            .send(WriterMessage::Snapshot(Snapshot { revision, cards }))
            .is_err()
        {
            log::error!("Write-through task has stopped, revision {} not saved", revision);
        }
    }

    /// Wait until every snapshot queued so far has been written
    pub async fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if sender.send(WriterMessage::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Write anything pending and stop the task
    pub async fn shutdown(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(WriterMessage::Shutdown);
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::error!("Write-through task ended abnormally: {}", e);
            }
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.counters.status(self.is_persistent())
    }
}

/// Decode stored records into cards, skipping any that do not fit the schema
fn decode_cards(records: Vec<Record>) -> Vec<Card> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Card>(Value::Object(record)) {
            Ok(card) => Some(card),
            Err(e) => {
                log::warn!("Skipping unreadable card record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        JsonFileBackend, MemoryBackend, RecordStore, StoreError, Upgrade, WriteBatch,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn cards(n: i64) -> Arc<Vec<Card>> {
        Arc::new((1..=n).map(|i| Card::new(i, format!("f{}", i), "b", "S")).collect())
    }

    struct Unavailable;

    #[async_trait]
    impl StoreBackend for Unavailable {
        async fn open(
            &self,
            _name: &str,
            _version: u32,
            _upgrade: &dyn Upgrade,
        ) -> crate::storage::Result<Arc<dyn RecordStore>> {
            Err(StoreError::Unavailable("disabled".into()))
        }
    }

    /// Records how many writes overlap and fails when asked to
    #[derive(Default)]
    struct Probe {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_next: AtomicBool,
        inner: tokio::sync::Mutex<Vec<Record>>,
    }

    #[async_trait]
    impl RecordStore for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn version(&self) -> u32 {
            CARD_SCHEMA_VERSION
        }

        async fn get_all(&self) -> crate::storage::Result<Vec<Record>> {
            Ok(self.inner.lock().await.clone())
        }

        async fn write(&self, batch: WriteBatch) -> crate::storage::Result<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StoreError::Unavailable("probe failure".into()));
            }
            let mut inner = self.inner.lock().await;
            *inner = batch.apply_to(&inner)?;
            Ok(())
        }
    }

    fn probe_synchronizer(probe: Arc<Probe>) -> Synchronizer {
        let counters = Arc::new(WriterCounters::default());
        let (sender, handle) = start_writer(probe, Arc::clone(&counters));
        Synchronizer {
            sender: Some(sender),
            handle: Some(handle),
            counters,
            persistent: true,
        }
    }

    #[tokio::test]
    async fn test_old_schema_records_get_default_stack() {
        let backend = MemoryBackend::new();
        backend
            .put_raw(
                "db",
                1,
                vec![
                    record(json!({"id": 1, "front": "a", "back": "b"})),
                    record(json!({"id": 2, "front": "c", "back": "d"})),
                ],
            )
            .await;

        let (sync, loaded) = Synchronizer::start(&backend, "db", "Stack 1").await;
        assert!(sync.is_persistent());
        assert_eq!(
            loaded,
            vec![Card::new(1, "a", "b", "Stack 1"), Card::new(2, "c", "d", "Stack 1")]
        );
        assert_eq!(backend.get_raw("db").await.unwrap().version, CARD_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_unreadable_records_are_skipped() {
        let backend = MemoryBackend::new();
        backend
            .put_raw(
                "db",
                CARD_SCHEMA_VERSION,
                vec![
                    record(json!({"id": 1, "front": "a", "back": "b", "stack": "S"})),
                    record(json!({"id": 2, "front": 7})),
                ],
            )
            .await;

        let (_sync, loaded) = Synchronizer::start(&backend, "db", "Stack 1").await;
        assert_eq!(loaded, vec![Card::new(1, "a", "b", "S")]);
    }

    #[tokio::test]
    async fn test_unavailable_store_runs_detached() {
        let (mut sync, loaded) = Synchronizer::start(&Unavailable, "db", "Stack 1").await;
        assert!(!sync.is_persistent());
        assert!(loaded.is_empty());

        sync.write_through(1, cards(2));
        sync.flush().await;
        sync.shutdown().await;
        assert_eq!(sync.status().writes_completed, 0);
    }

    #[tokio::test]
    async fn test_write_through_replaces_contents() {
        let backend = MemoryBackend::new();
        let (mut sync, _) = Synchronizer::start(&backend, "db", "Stack 1").await;

        sync.write_through(1, cards(3));
        sync.flush().await;
        sync.write_through(2, cards(1));
        sync.shutdown().await;
        assert!(sync.is_persistent());

        let stored = backend.get_raw("db").await.unwrap();
        assert_eq!(stored.records.len(), 1);
        assert_eq!(stored.records[0]["front"], "f1");
    }

    #[tokio::test]
    async fn test_write_through_round_trips_through_file() {
        let temp = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp.path().to_path_buf());

        let (mut sync, loaded) = Synchronizer::start(&backend, "db", "Stack 1").await;
        assert!(loaded.is_empty());
        sync.write_through(1, cards(2));
        sync.shutdown().await;

        let (_sync, reloaded) = Synchronizer::start(&backend, "db", "Stack 1").await;
        assert_eq!(reloaded, *cards(2));
    }

    #[tokio::test]
    async fn test_rapid_writes_never_overlap() {
        let probe = Arc::new(Probe::default());
        let mut sync = probe_synchronizer(Arc::clone(&probe));

        for revision in 1..=20 {
            sync.write_through(revision, cards(revision as i64));
            if revision % 4 == 0 {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        }
        sync.shutdown().await;

        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);
        let stored = probe.get_all().await.unwrap();
        assert_eq!(stored.len(), 20);

        let status = sync.status();
        assert_eq!(status.last_written_revision, 20);
        assert_eq!(status.writes_completed + status.snapshots_coalesced, 20);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_later_writes() {
        let probe = Arc::new(Probe::default());
        probe.fail_next.store(true, Ordering::SeqCst);
        let mut sync = probe_synchronizer(Arc::clone(&probe));

        sync.write_through(1, cards(1));
        sync.flush().await;
        sync.write_through(2, cards(2));
        sync.shutdown().await;

        let status = sync.status();
        assert!(status.persistent);
        assert_eq!(status.writes_failed, 1);
        assert_eq!(status.writes_completed, 1);
        assert_eq!(probe.get_all().await.unwrap().len(), 2);
    }
}
