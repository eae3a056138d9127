//! Logic core of a two-device encrypted text pager.
//!
//! Turns discrete key presses and a continuous rotary position reading
//! into outgoing encrypted datagrams to one fixed peer, and inbound
//! datagrams into decrypted, persisted, displayable history entries.
//!
//! The whole state machine lives in this library and is testable on
//! the host (no embedded hardware required):
//!
//! - [`cipher`]    - fixed-shift substitution over letters and digits
//! - [`selector`]  - rotary position → character, with hysteresis
//! - [`history`]   - append-only persisted message log with a cursor
//! - [`session`]   - compose buffer, mode switch, send/receive pipeline
//! - [`dispatcher`] - the per-cycle polling loop and screen rendering
//!
//! Hardware collaborators (OLED, keypad, potentiometer, ESP-NOW radio,
//! flash) sit behind traits; their ESP32-S3 implementations are gated
//! behind the `embedded` cargo feature and used by `main.rs`.
//!
//! Usage: `cargo test` on the host; `cargo build --features embedded`
//! for the target binary.

#![cfg_attr(not(test), no_std)]

pub mod cipher;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod input;
pub mod link;
pub mod selector;
pub mod session;
pub mod storage;
pub mod ui;

pub use cipher::Cipher;
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use history::{Direction, HistoryLog, HistoryRecord};
pub use selector::CharSelector;
pub use session::{Mode, Session, SessionEvent};
