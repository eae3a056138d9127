//! Append-only message history with cursor navigation, backed by a
//! persistent record store.
//!
//! The in-memory `count` is the source of truth for what is visible: it
//! always equals the number of `append` calls since the last `clear` (or
//! since boot, when it is loaded from the store once). A record that
//! failed to persist still counts - it reads back as a blank line, never
//! as corruption.

use crate::config::MAX_MESSAGE_LEN;
use crate::error::StoreError;
use crate::storage::MessageStore;
use heapless::String;

/// Direction tag on a history record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Label shown on the history screen.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Sent => "Sent",
            Direction::Received => "Received",
        }
    }
}

/// One persisted, directional message entry. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRecord {
    pub direction: Direction,
    pub text: String<MAX_MESSAGE_LEN>,
}

impl HistoryRecord {
    /// Build a record, truncating text that exceeds the capacity.
    pub fn new(direction: Direction, text: &str) -> Self {
        let mut t: String<MAX_MESSAGE_LEN> = String::new();
        for c in text.chars() {
            if t.push(c).is_err() {
                break;
            }
        }
        Self { direction, text: t }
    }
}

/// Ordered sequence of records (index 0 = oldest) plus a navigation
/// cursor kept inside `[0, count)` whenever the log is non-empty.
pub struct HistoryLog<S: MessageStore> {
    store: S,
    count: usize,
    cursor: usize,
}

impl<S: MessageStore> HistoryLog<S> {
    /// Open the log, reading the persisted record count once.
    pub fn open(store: S) -> Self {
        let count = store.load_count().unwrap_or(0);
        Self {
            store,
            count,
            cursor: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Append a record at the end and persist record and count.
    ///
    /// A store failure degrades to an in-memory entry: the count still
    /// advances so indexing stays consistent, and the error is reported
    /// for logging by the caller.
    pub fn append(&mut self, direction: Direction, text: &str) -> Result<(), StoreError> {
        let record = HistoryRecord::new(direction, text);
        let wrote = self.store.put_record(self.count, &record);
        self.count += 1;
        let counted = self.store.put_count(self.count);
        wrote.and(counted)
    }

    /// Read the record at `index`. `None` outside `[0, count)` or when
    /// the slot was never durably written.
    pub fn load(&self, index: usize) -> Option<HistoryRecord> {
        if index >= self.count {
            return None;
        }
        self.store.get_record(index)
    }

    /// Record under the cursor, if any.
    pub fn current(&self) -> Option<HistoryRecord> {
        self.load(self.cursor)
    }

    /// Move the cursor by `delta`, clamped to `[0, count-1]`. No-op on
    /// an empty log.
    pub fn navigate(&mut self, delta: isize) {
        if self.count == 0 {
            return;
        }
        let max = (self.count - 1) as isize;
        let next = (self.cursor as isize + delta).clamp(0, max);
        self.cursor = next as usize;
    }

    /// Place the cursor on the newest record. Used when entering
    /// history mode.
    pub fn seek_newest(&mut self) {
        self.cursor = self.count.saturating_sub(1);
    }

    /// Erase every stored record and reset count and cursor. Calling it
    /// again on an empty log is a no-op.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let wiped = self.store.wipe();
        self.count = 0;
        self.cursor = 0;
        wiped
    }
}
