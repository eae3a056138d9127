//! ESP-NOW transport to the one configured peer.
//!
//! The driver is split at init: the sender half lives inside the
//! session as its [`PeerLink`], the receiver half stays with the main
//! loop, which polls it once per cycle and queues frames into the
//! dispatcher inbox. Datagrams are fire-and-forget: `send` reports
//! hand-off to the radio driver, nothing more.

use crate::config::{MAX_FRAME_LEN, PEER_ADDRESS};
use crate::error::LinkError;
use crate::link::PeerLink;
use defmt::{info, warn};
use esp_wifi::esp_now::{EspNow, EspNowReceiver, EspNowSender, PeerInfo};
use heapless::Vec;

/// Outbound half: datagram sends to the fixed peer.
pub struct EspNowLink<'d> {
    sender: EspNowSender<'d>,
}

/// Inbound half: polled by the main loop.
pub struct EspNowInbox<'d> {
    receiver: EspNowReceiver<'d>,
}

/// Register the fixed peer and split the driver into its two halves.
pub fn split(esp_now: EspNow<'_>) -> Result<(EspNowLink<'_>, EspNowInbox<'_>), LinkError> {
    let (manager, sender, receiver) = esp_now.split();
    if !manager.peer_exists(&PEER_ADDRESS) {
        manager
            .add_peer(PeerInfo {
                peer_address: PEER_ADDRESS,
                lmk: None,
                channel: None,
                encrypt: false,
            })
            .map_err(|_| LinkError::NotReady)?;
    }
    info!("esp-now: peer {:x} registered", PEER_ADDRESS);
    Ok((EspNowLink { sender }, EspNowInbox { receiver }))
}

impl EspNowInbox<'_> {
    /// Poll one inbound datagram from the configured peer, if any.
    /// Traffic from other addresses is dropped here.
    pub fn receive(&mut self) -> Option<Vec<u8, MAX_FRAME_LEN>> {
        let received = self.receiver.receive()?;
        if received.info.src_address != PEER_ADDRESS {
            warn!("esp-now: frame from unknown peer dropped");
            return None;
        }
        let data = received.data();
        let len = data.len().min(MAX_FRAME_LEN);
        let mut frame: Vec<u8, MAX_FRAME_LEN> = Vec::new();
        let _ = frame.extend_from_slice(&data[..len]);
        Some(frame)
    }
}

impl PeerLink for EspNowLink<'_> {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        match self.sender.send(&PEER_ADDRESS, frame) {
            Ok(_waiter) => Ok(()),
            Err(e) => {
                warn!("esp-now: send rejected: {:?}", e);
                Err(LinkError::SendFailed)
            }
        }
    }
}
