//! Fixed-slot history storage on the ESP32's internal flash.
//!
//! Layout, starting at `STORE_FLASH_OFFSET`:
//!
//! ```text
//! [0..4)   magic "PGR1"  - region initialised marker
//! [4..8)   count (u32 LE)
//! [8..)    STORE_RECORD_SLOTS slots of STORE_SLOT_SIZE bytes each:
//!          [0] direction tag  [1] text length  [2..] text bytes
//! ```
//!
//! `wipe` only rewrites the header; orphaned record slots are
//! overwritten by later appends and stay invisible because the count
//! gates which slots are read.

use crate::config::{
    MAX_MESSAGE_LEN, STORE_FLASH_OFFSET, STORE_MAGIC, STORE_RECORD_SLOTS, STORE_SLOT_SIZE,
};
use crate::error::StoreError;
use crate::history::{Direction, HistoryRecord};
use crate::storage::MessageStore;
use defmt::{error, info};
use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;

const HEADER_SIZE: u32 = 8;

const TAG_SENT: u8 = 0;
const TAG_RECEIVED: u8 = 1;

/// History store on internal flash. One blocking read-modify-write
/// transaction per trait call; durable when the call returns.
pub struct FlashStore {
    flash: FlashStorage,
}

impl FlashStore {
    /// Open the region, initialising the header on first boot.
    pub fn open() -> Self {
        let mut store = Self {
            flash: FlashStorage::new(),
        };
        if store.read_header().is_none() {
            info!("flash store: initialising history region");
            if store.write_header(0).is_err() {
                error!("flash store: header init failed, history is volatile");
            }
        }
        store
    }

    fn slot_offset(index: usize) -> u32 {
        STORE_FLASH_OFFSET + HEADER_SIZE + (index as u32) * STORE_SLOT_SIZE as u32
    }

    fn read_header(&mut self) -> Option<u32> {
        let mut buf = [0u8; 8];
        self.flash.read(STORE_FLASH_OFFSET, &mut buf).ok()?;
        let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != STORE_MAGIC {
            return None;
        }
        Some(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]))
    }

    fn write_header(&mut self, count: u32) -> Result<(), StoreError> {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&STORE_MAGIC.to_le_bytes());
        buf[4..8].copy_from_slice(&count.to_le_bytes());
        self.flash
            .write(STORE_FLASH_OFFSET, &buf)
            .map_err(|_| StoreError::Io)
    }
}

impl MessageStore for FlashStore {
    fn put_record(&mut self, index: usize, record: &HistoryRecord) -> Result<(), StoreError> {
        if index >= STORE_RECORD_SLOTS {
            return Err(StoreError::Full);
        }
        let text = record.text.as_bytes();
        let mut buf = [0u8; STORE_SLOT_SIZE];
        buf[0] = match record.direction {
            Direction::Sent => TAG_SENT,
            Direction::Received => TAG_RECEIVED,
        };
        buf[1] = text.len() as u8;
        buf[2..2 + text.len()].copy_from_slice(text);
        self.flash
            .write(Self::slot_offset(index), &buf)
            .map_err(|_| {
                error!("flash store: record {} write failed", index);
                StoreError::Io
            })
    }

    fn get_record(&self, index: usize) -> Option<HistoryRecord> {
        if index >= STORE_RECORD_SLOTS {
            return None;
        }
        // FlashStorage reads need &mut; the borrow is local to the call.
        let mut flash = FlashStorage::new();
        let mut buf = [0u8; STORE_SLOT_SIZE];
        flash.read(Self::slot_offset(index), &mut buf).ok()?;

        let direction = match buf[0] {
            TAG_SENT => Direction::Sent,
            TAG_RECEIVED => Direction::Received,
            _ => return None,
        };
        let len = (buf[1] as usize).min(MAX_MESSAGE_LEN);
        let text = core::str::from_utf8(&buf[2..2 + len]).ok()?;
        Some(HistoryRecord::new(direction, text))
    }

    fn put_count(&mut self, count: usize) -> Result<(), StoreError> {
        self.write_header(count as u32)
    }

    fn load_count(&self) -> Option<usize> {
        let mut flash = FlashStorage::new();
        let mut buf = [0u8; 8];
        flash.read(STORE_FLASH_OFFSET, &mut buf).ok()?;
        let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != STORE_MAGIC {
            return None;
        }
        Some(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize)
    }

    fn wipe(&mut self) -> Result<(), StoreError> {
        self.write_header(0)
    }
}
