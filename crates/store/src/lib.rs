//! Persistence of the single tracked transfer.
//!
//! The record lives under one fixed key, [`STORAGE_KEY`], in a JSON key-value
//! store. Every context (process) pointed at the same store shares the slot;
//! the last writer wins, except that status updates go through
//! [`TxStore::advance`], which only moves a record forward and only while it
//! still holds the same hash.
//!
//! Changes made by other contexts are delivered through a [`Subscription`].
//! Dropping the subscription tears down whatever watches the store.

pub mod file;
pub mod memory;
pub mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use types::{TransactionRecord, TxStatus};

use alloy_primitives::TxHash;
use std::sync::Arc;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};

/// Key the transaction record is stored under.
pub const STORAGE_KEY: &str = "currentTransaction";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed storage contents: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable slot holding at most one [`TransactionRecord`].
pub trait TxStore: Send + Sync + 'static {
    /// Read the stored record, if any.
    fn load(&self) -> Result<Option<TransactionRecord>, StoreError>;

    /// Overwrite the stored record unconditionally.
    fn save(&self, record: &TransactionRecord) -> Result<(), StoreError>;

    /// Persist `status` for `hash` if the slot still holds `hash` and the
    /// status moves forward. Returns whether the write happened.
    fn advance(&self, hash: TxHash, status: TxStatus) -> Result<bool, StoreError> {
        match self.load()? {
            Some(current) if current.hash == hash && current.status.can_advance_to(status) => {
                self.save(&TransactionRecord { hash, status })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Subscribe to records written by other contexts.
    fn subscribe(&self) -> Subscription;
}

impl<S: TxStore> TxStore for Arc<S> {
    fn load(&self) -> Result<Option<TransactionRecord>, StoreError> {
        (**self).load()
    }

    fn save(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn advance(&self, hash: TxHash, status: TxStatus) -> Result<bool, StoreError> {
        (**self).advance(hash, status)
    }

    fn subscribe(&self) -> Subscription {
        (**self).subscribe()
    }
}

/// Stream of records written by other contexts.
///
/// A watcher task, if the store needs one, is aborted when the subscription
/// is dropped.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<TransactionRecord>,
    watcher: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) const fn new(
        rx: mpsc::UnboundedReceiver<TransactionRecord>,
        watcher: Option<JoinHandle<()>>,
    ) -> Self {
        Self { rx, watcher }
    }

    /// Wait for the next external change. `None` once the store side is gone.
    pub async fn recv(&mut self) -> Option<TransactionRecord> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}
