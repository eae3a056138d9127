//! Persistence seam for the message history.
//!
//! Records are keyed by their integer position in the log (no string-built
//! keys), plus one count field that gates which slots are visible. Every
//! trait call is a single scoped store session: the write is durable (or
//! has failed) by the time the call returns, and sessions never overlap -
//! the run-to-completion loop makes that a sequencing rule, not a lock.

use crate::error::StoreError;
use crate::history::HistoryRecord;

#[cfg(feature = "embedded")]
pub mod flash;
#[cfg(feature = "embedded")]
pub use flash::FlashStore;

/// Durable integer-indexed record storage for [`crate::history::HistoryLog`].
pub trait MessageStore {
    /// Durably write the record at `index`.
    fn put_record(&mut self, index: usize, record: &HistoryRecord) -> Result<(), StoreError>;

    /// Read the record at `index`, if one was successfully written there.
    fn get_record(&self, index: usize) -> Option<HistoryRecord>;

    /// Durably write the visible record count.
    fn put_count(&mut self, count: usize) -> Result<(), StoreError>;

    /// Read the persisted record count. `None` on a fresh or unreadable
    /// store.
    fn load_count(&self) -> Option<usize>;

    /// Erase all records and the count. Irreversible.
    fn wipe(&mut self) -> Result<(), StoreError>;
}

/// Volatile store, used as the runtime fallback when flash is unusable
/// and as the backing store for host tests. Loses everything on power
/// loss, which is exactly the degraded mode the history log promises.
#[derive(Default)]
pub struct MemStore {
    records: heapless::Vec<HistoryRecord, { crate::config::STORE_RECORD_SLOTS }>,
    count: Option<usize>,
}

impl MemStore {
    pub const fn new() -> Self {
        Self {
            records: heapless::Vec::new(),
            count: None,
        }
    }
}

impl MessageStore for MemStore {
    fn put_record(&mut self, index: usize, record: &HistoryRecord) -> Result<(), StoreError> {
        if index < self.records.len() {
            self.records[index] = record.clone();
            Ok(())
        } else if index == self.records.len() {
            self.records
                .push(record.clone())
                .map_err(|_| StoreError::Full)
        } else {
            Err(StoreError::Full)
        }
    }

    fn get_record(&self, index: usize) -> Option<HistoryRecord> {
        self.records.get(index).cloned()
    }

    fn put_count(&mut self, count: usize) -> Result<(), StoreError> {
        self.count = Some(count);
        Ok(())
    }

    fn load_count(&self) -> Option<usize> {
        self.count
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        self.count = None;
        Ok(())
    }
}
