//! JSON file backed store.
//!
//! The file holds a JSON object used as a key-value map; the record is kept
//! under [`STORAGE_KEY`] and other keys are left untouched. Other processes
//! using the same file are detected by polling it.

use crate::{StoreError, Subscription, TransactionRecord, TxStatus, TxStore, STORAGE_KEY};
use alloy_primitives::TxHash;
use serde_json::{Map, Value};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct FileStore {
    path: PathBuf,
    poll_interval: Duration,
    /// Value of the last write made by this context. Watchers skip it.
    own_write: Arc<Mutex<Option<Value>>>,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
            own_write: Arc::new(Mutex::new(None)),
            write_lock: Mutex::new(()),
        }
    }

    fn write_record(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        let mut map = read_map(&self.path)?;
        map.insert(STORAGE_KEY.to_string(), value.clone());

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // unique temp file per write, so concurrent contexts never share one
        let mut temp_file = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(temp_file.as_file_mut(), &Value::Object(map))?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        *self
            .own_write
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(value);

        debug!(path = %self.path.display(), tx_hash = %record.hash, status = %record.status, "Stored transaction record");
        Ok(())
    }
}

impl TxStore for FileStore {
    fn load(&self) -> Result<Option<TransactionRecord>, StoreError> {
        match read_map(&self.path)?.remove(STORAGE_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_record(record)
    }

    fn advance(&self, hash: TxHash, status: TxStatus) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match self.load()? {
            Some(current) if current.hash == hash && current.status.can_advance_to(status) => {
                self.write_record(&TransactionRecord { hash, status })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Spawns a polling watcher; must be called within a Tokio runtime.
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let path = self.path.clone();
        let own_write = Arc::clone(&self.own_write);
        let poll_interval = self.poll_interval;
        let mut seen = read_value(&path).ok().flatten();

        let watcher = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                interval.tick().await;

                let current = match read_value(&path) {
                    Ok(current) => current,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Failed to poll storage");
                        continue;
                    }
                };
                if current == seen {
                    continue;
                }
                seen.clone_from(&current);

                let Some(value) = current else {
                    continue;
                };
                let is_own = own_write
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .as_ref()
                    == Some(&value);
                if is_own {
                    continue;
                }

                match serde_json::from_value::<TransactionRecord>(value) {
                    Ok(record) => {
                        debug!(tx_hash = %record.hash, status = %record.status, "External storage change");
                        if tx.send(record).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Ignoring malformed external storage change"),
                }
            }
        });

        Subscription::new(rx, Some(watcher))
    }
}

fn read_map(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => return Err(e.into()),
    };
    if contents.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    Ok(serde_json::from_slice(&contents)?)
}

fn read_value(path: &Path) -> Result<Option<Value>, StoreError> {
    Ok(read_map(path)?.remove(STORAGE_KEY))
}
