//! Peer-to-peer datagram link: one fixed counterpart, fire-and-forget.
//!
//! The wire format is the encrypted message text followed by a
//! terminating NUL, one message per datagram. No ordering, delivery or
//! authentication guarantees exist at this layer.

#[cfg(feature = "embedded")]
pub mod espnow;
#[cfg(feature = "embedded")]
pub use espnow::EspNowLink;

use crate::config::MAX_FRAME_LEN;
use crate::error::LinkError;
use heapless::Vec;

/// 6-byte hardware address identifying a peer device.
pub type PeerAddress = [u8; 6];

/// Best-effort, unordered, unacknowledged datagram channel to the one
/// configured peer.
pub trait PeerLink {
    /// Hand one frame to the radio. `Ok` means confirmed hand-off to
    /// the driver, not delivery.
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError>;

    /// Whether the link came up at boot. Display-only; a send on a
    /// not-ready link fails in-band.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Frame a message for the wire: text bytes plus the terminating NUL.
pub fn frame(text: &str) -> Result<Vec<u8, MAX_FRAME_LEN>, LinkError> {
    let mut out: Vec<u8, MAX_FRAME_LEN> = Vec::new();
    out.extend_from_slice(text.as_bytes())
        .map_err(|_| LinkError::FrameTooLong)?;
    out.push(0).map_err(|_| LinkError::FrameTooLong)?;
    Ok(out)
}

/// Recover the message text from an inbound frame: stop at the first
/// NUL, tolerate its absence, reject non-UTF-8 payloads.
pub fn deframe(payload: &[u8]) -> Option<&str> {
    let end = payload
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(payload.len());
    core::str::from_utf8(&payload[..end]).ok()
}

/// Stand-in link installed when radio init fails at boot. Keeps the
/// device usable for composing and reading history.
pub struct OfflineLink;

impl PeerLink for OfflineLink {
    fn send(&mut self, _frame: &[u8]) -> Result<(), LinkError> {
        Err(LinkError::NotReady)
    }

    fn is_ready(&self) -> bool {
        false
    }
}
