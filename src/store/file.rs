//! JSON file store backend
//!
//! Both records are kept in a single JSON document shaped like the real-time
//! database tree (`{"timer": {...}, "githubPushTimer": {...}}`). Every write
//! rewrites the document through a temporary file and a rename.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::{fs, sync::{watch, Mutex}};
use tracing::{debug, info};

use super::{MemoryStore, RecordKey, StoreResult, TimerStore};

/// Store persisted to a JSON file, with in-process change notifications
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: MemoryStore,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the document at `path`, starting empty if it does not exist
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut document = match fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Map::new(),
            Ok(contents) => serde_json::from_str::<Map<String, Value>>(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("State file {} not found, starting empty", path.display());
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut take = |key: RecordKey| document.remove(key.as_str()).filter(|v| !v.is_null());
        let timer = take(RecordKey::Timer);
        let push_cycle = take(RecordKey::PushCycle);
        info!(
            "Opened state file {} (timer={}, push cycle={})",
            path.display(),
            timer.is_some(),
            push_cycle.is_some()
        );

        Ok(Self {
            path,
            records: MemoryStore::with_records(timer, push_cycle),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, key: RecordKey, value: &Value) -> StoreResult<()> {
        let mut document = Map::new();
        for other in RecordKey::ALL {
            let current = if other == key {
                Some(value.clone())
            } else {
                self.records.snapshot(other)
            };
            if let Some(current) = current {
                document.insert(other.as_str().to_string(), current);
            }
        }

        let contents = serde_json::to_vec_pretty(&Value::Object(document))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).await?;
        fs::rename(&tmp_path, &self.path).await?;
        debug!("Persisted {} record to {}", key, self.path.display());
        Ok(())
    }
}

impl TimerStore for FileStore {
    async fn get(&self, key: RecordKey) -> StoreResult<Option<Value>> {
        Ok(self.records.snapshot(key))
    }

    async fn set(&self, key: RecordKey, value: Value) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        if self.records.snapshot(key).as_ref() == Some(&value) {
            return Ok(());
        }
        self.persist(key, &value).await?;
        self.records.write(key, value);
        Ok(())
    }

    async fn subscribe(&self, key: RecordKey) -> StoreResult<watch::Receiver<Option<Value>>> {
        self.records.subscribe(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get(RecordKey::Timer).await.unwrap(), None);
        store
            .set(RecordKey::Timer, json!({ "isRunning": false, "endTime": null, "remainingTime": 10 }))
            .await
            .unwrap();
        store
            .set(RecordKey::PushCycle, json!({ "endTime": 1, "pushCount": 2 }))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(RecordKey::Timer).await.unwrap(),
            Some(json!({ "isRunning": false, "endTime": null, "remainingTime": 10 }))
        );
        assert_eq!(
            reopened.get(RecordKey::PushCycle).await.unwrap(),
            Some(json!({ "endTime": 1, "pushCount": 2 }))
        );

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("timer").is_some());
        assert!(raw.get("githubPushTimer").is_some());
    }

    #[tokio::test]
    async fn writes_notify_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).await.unwrap();
        let mut rx = store.subscribe(RecordKey::PushCycle).await.unwrap();

        store.set(RecordKey::PushCycle, json!({ "endTime": 9, "pushCount": 1 })).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(json!({ "endTime": 9, "pushCount": 1 })));
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).await.is_err());
    }
}
