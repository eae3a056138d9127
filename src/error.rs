//! Unified error type for pagerlink.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The peer link refused or failed to transmit a frame.
    Link(LinkError),

    /// The persistent message store failed a read or write.
    Store(StoreError),

    /// I²C transaction to the display failed.
    Display,
}

/// Errors surfaced by the peer-to-peer datagram link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Radio never came up at boot; the device is in offline mode.
    NotReady,

    /// The radio driver rejected the transmit request.
    SendFailed,

    /// Payload exceeds the maximum frame size.
    FrameTooLong,
}

/// Errors surfaced by the persistent message store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backing storage rejected the read or write.
    Io,

    /// Record index is beyond the reserved slot area.
    Full,
}

// Convenience conversions

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}
