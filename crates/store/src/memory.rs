use crate::{StoreError, Subscription, TransactionRecord, TxStatus, TxStore};
use alloy_primitives::TxHash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// In-process store. Writes through [`TxStore`] come from "this" context;
/// [`MemoryStore::write_external`] plays the part of another context.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    record: Option<TransactionRecord>,
    listeners: Vec<mpsc::UnboundedSender<TransactionRecord>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated as if left behind by an earlier session.
    pub fn with_record(record: TransactionRecord) -> Self {
        let store = Self::default();
        store.lock().record = Some(record);
        store
    }

    /// Overwrite the record as another context would and notify subscribers.
    pub fn write_external(&self, record: TransactionRecord) {
        let mut inner = self.lock();
        inner.record = Some(record);
        inner.listeners.retain(|tx| tx.send(record).is_ok());
    }

    /// Number of writes made through [`TxStore`].
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TxStore for MemoryStore {
    fn load(&self) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.lock().record)
    }

    fn save(&self, record: &TransactionRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.record = Some(*record);
        inner.writes += 1;
        Ok(())
    }

    fn advance(&self, hash: TxHash, status: TxStatus) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        match inner.record {
            Some(current) if current.hash == hash && current.status.can_advance_to(status) => {
                inner.record = Some(TransactionRecord { hash, status });
                inner.writes += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().listeners.push(tx);
        Subscription::new(rx, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn record(byte: u8, status: TxStatus) -> TransactionRecord {
        TransactionRecord {
            hash: B256::repeat_byte(byte),
            status,
        }
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&record(1, TxStatus::Pending)).unwrap();
        store.save(&record(2, TxStatus::Pending)).unwrap();

        assert_eq!(store.load().unwrap(), Some(record(2, TxStatus::Pending)));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_advance_requires_same_hash() {
        let store = MemoryStore::with_record(record(2, TxStatus::Pending));

        // an older transfer resolving must not clobber the newer record
        assert!(!store.advance(B256::repeat_byte(1), TxStatus::Confirmed).unwrap());
        assert_eq!(store.load().unwrap(), Some(record(2, TxStatus::Pending)));

        assert!(store.advance(B256::repeat_byte(2), TxStatus::Failed).unwrap());
        assert_eq!(store.load().unwrap(), Some(record(2, TxStatus::Failed)));
    }

    #[test]
    fn test_advance_never_leaves_terminal() {
        let store = MemoryStore::with_record(record(1, TxStatus::Confirmed));
        assert!(!store.advance(B256::repeat_byte(1), TxStatus::Failed).unwrap());
        assert!(!store.advance(B256::repeat_byte(1), TxStatus::Pending).unwrap());
        assert_eq!(store.load().unwrap(), Some(record(1, TxStatus::Confirmed)));
    }

    #[tokio::test]
    async fn test_external_writes_reach_subscribers() {
        let store = MemoryStore::new();
        let mut sub = store.subscribe();

        // own writes are not echoed back
        store.save(&record(1, TxStatus::Pending)).unwrap();
        store.write_external(record(3, TxStatus::Confirmed));

        assert_eq!(sub.recv().await, Some(record(3, TxStatus::Confirmed)));
        assert_eq!(store.load().unwrap(), Some(record(3, TxStatus::Confirmed)));
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let store = MemoryStore::new();
        let sub = store.subscribe();
        drop(sub);

        store.write_external(record(1, TxStatus::Pending));
        assert!(store.lock().listeners.is_empty());
    }
}
