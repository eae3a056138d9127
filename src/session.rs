//! Message session: compose buffer, typing/history mode switch, and the
//! encrypt-on-send / decrypt-on-receive pipeline.
//!
//! The session owns all mutable pager state (buffer, mode, history) and
//! is driven purely by values: key symbols, the selector's committed
//! character, inbound frame bytes and a millisecond clock. That keeps it
//! fully testable on the host and keeps the receive path from ever
//! racing an in-progress composition.

use crate::cipher::Cipher;
use crate::config::{MAX_MESSAGE_LEN, TOGGLE_COOLDOWN_MS};
use crate::error::LinkError;
use crate::history::{Direction, HistoryLog};
use crate::input::Key;
use crate::link::{self, PeerLink};
use crate::storage::MessageStore;
use heapless::String;

/// Which view the device is in. Boot starts in `Typing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Typing,
    History,
}

/// Outcome of one key or inbound-frame event. The dispatcher maps these
/// to confirmation screens and hold windows.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    None,
    ModeChanged(Mode),
    /// Message handed to the radio; carries the plaintext for the
    /// confirmation screen.
    Sent(String<MAX_MESSAGE_LEN>),
    /// Transport refused the frame; the draft is retained for retry.
    SendFailed(LinkError),
    BufferCleared,
    HistoryCleared,
    /// Decrypted inbound message, already appended to history.
    Received(String<MAX_MESSAGE_LEN>),
}

/// Owns the compose buffer, the mode switch and the history log, and
/// orchestrates the cipher and peer link on send/receive.
pub struct Session<S: MessageStore, L: PeerLink> {
    buffer: String<MAX_MESSAGE_LEN>,
    mode: Mode,
    history: HistoryLog<S>,
    cipher: Cipher,
    link: L,
    last_toggle_ms: Option<u64>,
}

impl<S: MessageStore, L: PeerLink> Session<S, L> {
    /// Boot-time construction: empty buffer, `Typing` mode, history
    /// count loaded once from the store.
    pub fn new(store: S, link: L) -> Self {
        Self {
            buffer: String::new(),
            mode: Mode::Typing,
            history: HistoryLog::open(store),
            cipher: Cipher::default(),
            link,
            last_toggle_ms: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryLog<S> {
        &self.history
    }

    pub fn link_ready(&self) -> bool {
        self.link.is_ready()
    }

    /// Route one key symbol. `selected` is the character selector's
    /// committed character at the time of the press.
    pub fn handle_key(&mut self, key: Key, selected: char, now_ms: u64) -> SessionEvent {
        if key == Key::D {
            return self.toggle_mode(now_ms);
        }
        match self.mode {
            Mode::Typing => self.handle_typing_key(key, selected),
            Mode::History => self.handle_history_key(key),
        }
    }

    /// Inbound datagram path, drained once per loop cycle. Appends to
    /// history regardless of mode and never touches buffer or mode.
    pub fn handle_incoming(&mut self, payload: &[u8]) -> SessionEvent {
        let Some(ciphertext) = link::deframe(payload) else {
            return SessionEvent::None;
        };
        let plain = self.cipher.decrypt(ciphertext);
        let _ = self.history.append(Direction::Received, &plain);
        SessionEvent::Received(plain)
    }

    fn toggle_mode(&mut self, now_ms: u64) -> SessionEvent {
        // Contact bounce on the toggle key would otherwise flip the
        // mode twice in quick succession.
        if let Some(last) = self.last_toggle_ms {
            if now_ms.saturating_sub(last) < TOGGLE_COOLDOWN_MS {
                return SessionEvent::None;
            }
        }
        self.last_toggle_ms = Some(now_ms);
        self.mode = match self.mode {
            Mode::Typing => {
                self.history.seek_newest();
                Mode::History
            }
            Mode::History => Mode::Typing,
        };
        SessionEvent::ModeChanged(self.mode)
    }

    fn handle_typing_key(&mut self, key: Key, selected: char) -> SessionEvent {
        match key {
            // `0` confirms the rotary selection into the buffer. A full
            // buffer silently ignores the append.
            Key::Digit(0) => {
                let _ = self.buffer.push(selected);
                SessionEvent::None
            }
            Key::Star => {
                self.buffer.pop();
                SessionEvent::None
            }
            Key::C => {
                self.buffer.clear();
                SessionEvent::BufferCleared
            }
            Key::Hash => self.send(),
            _ => SessionEvent::None,
        }
    }

    fn handle_history_key(&mut self, key: Key) -> SessionEvent {
        match key {
            Key::A => {
                self.history.navigate(-1);
                SessionEvent::None
            }
            Key::B => {
                self.history.navigate(1);
                SessionEvent::None
            }
            Key::C => {
                let _ = self.history.clear();
                SessionEvent::HistoryCleared
            }
            _ => SessionEvent::None,
        }
    }

    /// Encrypt and transmit the compose buffer. An empty buffer is a
    /// no-op. The buffer is cleared only on confirmed hand-off to the
    /// radio; on transport failure the draft stays for retry.
    fn send(&mut self) -> SessionEvent {
        if self.buffer.is_empty() {
            return SessionEvent::None;
        }
        let ciphertext = self.cipher.encrypt(&self.buffer);
        let frame = match link::frame(&ciphertext) {
            Ok(f) => f,
            Err(e) => return SessionEvent::SendFailed(e),
        };
        match self.link.send(&frame) {
            Ok(()) => {
                let plain = self.buffer.clone();
                let _ = self.history.append(Direction::Sent, &plain);
                self.buffer.clear();
                SessionEvent::Sent(plain)
            }
            Err(e) => SessionEvent::SendFailed(e),
        }
    }
}
