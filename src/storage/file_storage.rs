//! JSON file store backend
//!
//! Each named store lives in one file under the data directory:
//! ```text
//! {data_dir}/{name}.json   # { "version": 2, "records": [ {...}, ... ] }
//! ```
//! Writes go to a temporary sibling file that is then renamed over the store
//! file, so a crash mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use super::models::{Record, StoreFile, WriteBatch};
use super::{upgrade_records, RecordStore, Result, StoreBackend, StoreError, Upgrade};

/// Backend keeping one JSON document per store
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    data_dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Default data directory (e.g., ~/.local/share/cardstack)
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("cardstack"))
            .ok_or_else(|| StoreError::Unavailable("no local data directory".to_string()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing store `name`
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }
}

async fn read_store_file(path: &Path) -> Result<StoreFile> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreFile::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_store_file(path: &Path, file: &StoreFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(file)?).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[async_trait]
impl StoreBackend for JsonFileBackend {
    async fn open(
        &self,
        name: &str,
        version: u32,
        upgrade: &dyn Upgrade,
    ) -> Result<Arc<dyn RecordStore>> {
        let path = self.store_path(name);
        let file = read_store_file(&path).await?;

        let mut records = file.records;
        if upgrade_records(name, &mut records, file.version, version, upgrade)? {
            write_store_file(
                &path,
                &StoreFile {
                    version,
                    records: records.clone(),
                },
            )
            .await?;
        }

        Ok(Arc::new(JsonFileStore {
            name: name.to_string(),
            version,
            path,
            records: Mutex::new(records),
        }))
    }
}

struct JsonFileStore {
    name: String,
    version: u32,
    path: PathBuf,
    /// Last committed contents of the file
    records: Mutex<Vec<Record>>,
}

#[async_trait]
impl RecordStore for JsonFileStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> u32 {
        self.version
    }

    async fn get_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.lock().await.clone())
    }

    async fn write(&self, batch: WriteBatch) -> Result<()> {
        let mut records = self.records.lock().await;
        let next = batch.apply_to(&records)?;

        write_store_file(
            &self.path,
            &StoreFile {
                version: self.version,
                records: next.clone(),
            },
        )
        .await?;

        *records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordCursor;
    use serde_json::json;
    use tempfile::TempDir;

    struct NoUpgrade;

    impl Upgrade for NoUpgrade {
        fn upgrade(&self, _old_version: u32, _cursor: &mut RecordCursor<'_>) -> Result<()> {
            Ok(())
        }
    }

    fn create_test_backend() -> (JsonFileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().to_path_buf());
        (backend, temp_dir)
    }

    fn record(id: i64, front: &str) -> Record {
        json!({ "id": id, "front": front }).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_store_creates_file() {
        let (backend, _temp) = create_test_backend();

        let store = backend.open("db", 2, &NoUpgrade).await.unwrap();
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(backend.store_path("db").exists());
    }

    #[tokio::test]
    async fn test_write_persists_across_reopen() {
        let (backend, _temp) = create_test_backend();

        let store = backend.open("db", 2, &NoUpgrade).await.unwrap();
        let mut batch = WriteBatch::new();
        batch.clear().add(record(1, "a")).add(record(2, "b"));
        store.write(batch).await.unwrap();
        drop(store);

        let reopened = backend.open("db", 2, &NoUpgrade).await.unwrap();
        let records = reopened.get_all().await.unwrap();
        assert_eq!(records, vec![record(1, "a"), record(2, "b")]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_file() {
        let (backend, _temp) = create_test_backend();

        let store = backend.open("db", 2, &NoUpgrade).await.unwrap();
        let mut batch = WriteBatch::new();
        batch.add(record(1, "a"));
        store.write(batch).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.clear().add(record(3, "c")).add(record(3, "d"));
        assert!(store.write(batch).await.is_err());

        let content = std::fs::read_to_string(backend.store_path("db")).unwrap();
        let file: StoreFile = serde_json::from_str(&content).unwrap();
        assert_eq!(file.records, vec![record(1, "a")]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (backend, _temp) = create_test_backend();
        std::fs::write(backend.store_path("db"), "not json").unwrap();

        let result = backend.open("db", 2, &NoUpgrade).await;
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
