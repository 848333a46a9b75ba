//! Durable keyed record stores
//!
//! A store is opened by name at a schema version. Opening an older store runs an
//! [`Upgrade`] over every record before the store is handed out. After that the
//! only operations are reading every record and committing a [`WriteBatch`] of
//! `clear`/`add` operations.

mod file_storage;
mod memory;
pub mod migration;
mod models;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use file_storage::JsonFileBackend;
pub use memory::MemoryBackend;
pub use models::*;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store '{name}' is at version {stored}, cannot open it at version {requested}")]
    VersionDowngrade {
        name: String,
        stored: u32,
        requested: u32,
    },

    #[error("Record key already exists: {0}")]
    DuplicateKey(i64),

    #[error("Record has no integer '{}' key", KEY_FIELD)]
    MissingKey,

    #[error("Upgrade failed: {0}")]
    Upgrade(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Schema upgrade run while opening a store whose version is behind
pub trait Upgrade: Send + Sync {
    fn upgrade(&self, old_version: u32, cursor: &mut RecordCursor<'_>) -> Result<()>;
}

/// Opens named, versioned stores
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn open(
        &self,
        name: &str,
        version: u32,
        upgrade: &dyn Upgrade,
    ) -> Result<Arc<dyn RecordStore>>;
}

/// An opened store
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> u32;

    async fn get_all(&self) -> Result<Vec<Record>>;

    /// Commit every operation of `batch`, or none of them
    async fn write(&self, batch: WriteBatch) -> Result<()>;
}

/// Bring `records` from `stored` to `requested`. Returns true when an upgrade ran.
pub(crate) fn upgrade_records(
    name: &str,
    records: &mut Vec<Record>,
    stored: u32,
    requested: u32,
    upgrade: &dyn Upgrade,
) -> Result<bool> {
    if stored > requested {
        return Err(StoreError::VersionDowngrade {
            name: name.to_string(),
            stored,
            requested,
        });
    }
    if stored == requested {
        return Ok(false);
    }

    let mut cursor = RecordCursor::new(records);
    upgrade.upgrade(stored, &mut cursor)?;
    log::info!(
        "Upgraded store '{}' from version {} to {} ({} records)",
        name,
        stored,
        requested,
        cursor.visited()
    );

    for record in records.iter() {
        record_key(record)?;
    }
    Ok(true)
}
