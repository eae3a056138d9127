//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Character selection

/// Ordered alphabet the rotary selector picks from. Index-addressable,
/// immutable at runtime.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 ";

/// Number of dummy slots between adjacent characters. A larger value
/// widens the hysteresis band around each character boundary.
pub const DUMMY_SLOTS: usize = 3;

/// Upper bound of the raw rotary sample (12-bit ADC).
pub const ADC_MAX: u16 = 4095;

/// Samples averaged per rotary reading (embedded oversampling).
pub const ROTARY_OVERSAMPLE: usize = 10;

// Cipher

/// Substitution shift applied to uppercase letters and digits.
/// Both devices must agree on this value.
pub const CIPHER_SHIFT: u8 = 3;

// Buffers

/// Maximum composed / stored message length in bytes.
pub const MAX_MESSAGE_LEN: usize = 64;

/// Wire frame size: message bytes plus the terminating NUL.
pub const MAX_FRAME_LEN: usize = MAX_MESSAGE_LEN + 1;

/// Inbound datagrams buffered between loop cycles. Overflow drops the
/// oldest-pending frame's successors (best-effort link).
pub const INBOX_DEPTH: usize = 4;

// Timing

/// Minimum spacing between mode toggles, so contact bounce on the `D`
/// key cannot flip the mode twice.
pub const TOGGLE_COOLDOWN_MS: u64 = 300;

/// How long the "Sent:" confirmation stays on screen.
pub const SEND_HOLD_MS: u64 = 1000;

/// How long the "Typing Cleared" confirmation stays on screen.
pub const CLEAR_HOLD_MS: u64 = 500;

/// How long the "History Cleared" confirmation stays on screen.
pub const HISTORY_CLEAR_HOLD_MS: u64 = 1000;

/// How long an inbound-message notification stays on screen.
pub const RECEIVE_HOLD_MS: u64 = 1000;

/// Main loop period (embedded polling cadence, ms).
pub const LOOP_PERIOD_MS: u32 = 10;

// Peer link

/// Hardware address of the one configured counterpart device.
/// Flash the second unit with this set to the first unit's address.
pub const PEER_ADDRESS: [u8; 6] = [0xA0, 0x85, 0xE3, 0xF0, 0x8F, 0x18];

// GPIO pin assignments (ESP32-S3 defaults)
//
// These are logical names; the concrete `esp_hal` pin types are
// selected in `main.rs`. Adjust for your wiring.
//
//   Keypad rows     → GPIO42, GPIO41, GPIO40, GPIO39
//   Keypad columns  → GPIO38, GPIO37, GPIO36, GPIO35
//   Potentiometer   → GPIO1 (ADC1)
//   I²C SDA         → GPIO8
//   I²C SCL         → GPIO9

// Message storage

/// Byte offset of the history region in internal flash.
pub const STORE_FLASH_OFFSET: u32 = 0x9000;

/// Magic word marking an initialised history region ("PGR1").
pub const STORE_MAGIC: u32 = 0x5047_5231;

/// Maximum number of record slots reserved in flash. Appends beyond
/// this degrade to in-memory counting.
pub const STORE_RECORD_SLOTS: usize = 64;

/// Bytes per record slot: direction + length + text, padded.
pub const STORE_SLOT_SIZE: usize = 68;
