//! Process-local store backend

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::models::{Record, StoreFile, WriteBatch};
use super::{upgrade_records, RecordStore, Result, StoreBackend, Upgrade};

type Shared = Arc<Mutex<HashMap<String, StoreFile>>>;

/// Keeps every store in memory. Clones share the same stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    stores: Shared,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw contents of a store, bypassing upgrades
    pub async fn put_raw(&self, name: &str, version: u32, records: Vec<Record>) {
        self.stores
            .lock()
            .await
            .insert(name.to_string(), StoreFile { version, records });
    }

    /// Raw contents of a store, if it exists
    pub async fn get_raw(&self, name: &str) -> Option<StoreFile> {
        self.stores.lock().await.get(name).cloned()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn open(
        &self,
        name: &str,
        version: u32,
        upgrade: &dyn Upgrade,
    ) -> Result<Arc<dyn RecordStore>> {
        let mut stores = self.stores.lock().await;
        let file = stores.entry(name.to_string()).or_default();

        let mut records = file.records.clone();
        if upgrade_records(name, &mut records, file.version, version, upgrade)? {
            *file = StoreFile { version, records };
        }

        Ok(Arc::new(MemoryStore {
            name: name.to_string(),
            version,
            stores: Arc::clone(&self.stores),
        }))
    }
}

struct MemoryStore {
    name: String,
    version: u32,
    stores: Shared,
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> u32 {
        self.version
    }

    async fn get_all(&self) -> Result<Vec<Record>> {
        let stores = self.stores.lock().await;
        Ok(stores
            .get(&self.name)
            .map(|f| f.records.clone())
            .unwrap_or_default())
    }

    async fn write(&self, batch: WriteBatch) -> Result<()> {
        let mut stores = self.stores.lock().await;
        let file = stores.entry(self.name.clone()).or_default();
        file.records = batch.apply_to(&file.records)?;
        file.version = self.version;
        Ok(())
    }
}
