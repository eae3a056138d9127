//! Per-cycle control loop: drain inbound frames, poll inputs, route
//! key events to the session, render the current view.
//!
//! Inbound datagrams are queued by the radio driver via
//! [`Dispatcher::push_incoming`] and drained at the start of every
//! cycle, so receive handling has a deterministic place in the loop
//! instead of being an arbitrary preemption point. Confirmation
//! screens ("Sent:", "Received:", clears) are held on screen for a
//! bounded window during which key input is discarded - the
//! non-blocking equivalent of the settle delay.

use crate::config::{
    CLEAR_HOLD_MS, HISTORY_CLEAR_HOLD_MS, INBOX_DEPTH, MAX_FRAME_LEN, MAX_MESSAGE_LEN,
    RECEIVE_HOLD_MS, SEND_HOLD_MS, TOGGLE_COOLDOWN_MS,
};
use crate::error::Error;
use crate::input::{KeyInput, RotaryInput};
use crate::link::PeerLink;
use crate::selector::CharSelector;
use crate::session::{Mode, Session, SessionEvent};
use crate::storage::MessageStore;
use crate::ui::{self, DisplaySurface};
use core::fmt::Write as _;
use heapless::{Deque, String, Vec};

pub struct Dispatcher<S, L, D, K, R>
where
    S: MessageStore,
    L: PeerLink,
    D: DisplaySurface,
    K: KeyInput,
    R: RotaryInput,
{
    session: Session<S, L>,
    selector: CharSelector,
    display: D,
    keys: K,
    rotary: R,
    inbox: Deque<Vec<u8, MAX_FRAME_LEN>, INBOX_DEPTH>,
    hold_until_ms: u64,
}

impl<S, L, D, K, R> Dispatcher<S, L, D, K, R>
where
    S: MessageStore,
    L: PeerLink,
    D: DisplaySurface,
    K: KeyInput,
    R: RotaryInput,
{
    pub fn new(session: Session<S, L>, display: D, keys: K, rotary: R) -> Self {
        Self {
            session,
            selector: CharSelector::new(),
            display,
            keys,
            rotary,
            inbox: Deque::new(),
            hold_until_ms: 0,
        }
    }

    pub fn session(&self) -> &Session<S, L> {
        &self.session
    }

    pub fn selector(&self) -> &CharSelector {
        &self.selector
    }

    /// Queue one inbound datagram for the next cycle. Returns `false`
    /// when the inbox is full and the frame was dropped (best-effort
    /// link, never blocks).
    pub fn push_incoming(&mut self, payload: &[u8]) -> bool {
        let len = payload.len().min(MAX_FRAME_LEN);
        let mut frame: Vec<u8, MAX_FRAME_LEN> = Vec::new();
        let _ = frame.extend_from_slice(&payload[..len]);
        self.inbox.push_back(frame).is_ok()
    }

    /// One iteration of the cooperative loop.
    pub fn run_cycle(&mut self, now_ms: u64) -> Result<(), Error> {
        self.drain_inbox(now_ms)?;

        self.selector.update(self.rotary.poll());

        if now_ms < self.hold_until_ms {
            // A confirmation screen is being held; key presses are
            // discarded like they were during the blocking settle delay.
            let _ = self.keys.poll();
            return Ok(());
        }

        if let Some(key) = self.keys.poll() {
            let selected = self.selector.committed_char();
            let event = self.session.handle_key(key, selected, now_ms);
            self.apply_event(event, now_ms)?;
            if now_ms < self.hold_until_ms {
                return Ok(());
            }
        }

        self.render()
    }

    fn drain_inbox(&mut self, now_ms: u64) -> Result<(), Error> {
        while let Some(frame) = self.inbox.pop_front() {
            if let SessionEvent::Received(text) = self.session.handle_incoming(&frame) {
                // Transient notification only while typing; in history
                // mode the new record shows up through navigation.
                if self.session.mode() == Mode::Typing {
                    self.notice("Received:", &text)?;
                    self.hold_until_ms = now_ms + RECEIVE_HOLD_MS;
                }
            }
        }
        Ok(())
    }

    fn apply_event(&mut self, event: SessionEvent, now_ms: u64) -> Result<(), Error> {
        match event {
            SessionEvent::Sent(text) => {
                self.notice("Sent:", &text)?;
                self.hold_until_ms = now_ms + SEND_HOLD_MS;
            }
            SessionEvent::SendFailed(_) => {
                self.notice("Send failed", "Draft kept")?;
                self.hold_until_ms = now_ms + SEND_HOLD_MS;
            }
            SessionEvent::BufferCleared => {
                self.notice("Typing Cleared", "")?;
                self.hold_until_ms = now_ms + CLEAR_HOLD_MS;
            }
            SessionEvent::HistoryCleared => {
                self.notice("History Cleared", "")?;
                self.hold_until_ms = now_ms + HISTORY_CLEAR_HOLD_MS;
            }
            SessionEvent::ModeChanged(_) => {
                // Show the new view right away, then swallow key input
                // for the settle window.
                self.render()?;
                self.hold_until_ms = now_ms + TOGGLE_COOLDOWN_MS;
            }
            // Receive events surface via drain_inbox.
            SessionEvent::Received(_) | SessionEvent::None => {}
        }
        Ok(())
    }

    /// Two-line confirmation screen.
    fn notice(&mut self, title: &str, body: &str) -> Result<(), Error> {
        self.display.clear();
        self.display.draw_line(0, 10, title);
        if !body.is_empty() {
            self.display.draw_line(0, 30, body);
        }
        self.display.commit()
    }

    /// Render the current mode's view.
    fn render(&mut self) -> Result<(), Error> {
        self.display.clear();
        match self.session.mode() {
            Mode::Typing => {
                self.display.draw_line(0, 10, "Typing:");
                self.display.draw_line(50, 10, self.session.buffer());
                self.display.draw_line(0, 30, "Select:");
                let label = ui::selected_label(self.selector.committed_char());
                self.display.draw_line(50, 30, &label);
                if !self.session.link_ready() {
                    self.display.draw_line(0, 60, "offline");
                }
            }
            Mode::History => {
                self.display.draw_line(0, 10, "History:");
                let history = self.session.history();
                if history.is_empty() {
                    self.display.draw_line(0, 30, "No messages");
                } else {
                    let mut position: String<16> = String::new();
                    let _ = write!(position, "{}/{}", history.cursor() + 1, history.count());
                    self.display.draw_line(0, 20, &position);
                    match history.current() {
                        Some(record) => {
                            let mut line: String<{ MAX_MESSAGE_LEN + 12 }> = String::new();
                            let _ = write!(line, "{}: {}", record.direction.label(), record.text);
                            self.display.draw_line(0, 40, &line);
                        }
                        // Counted but never durably written (store
                        // failure) - shows as a blank line.
                        None => self.display.draw_line(0, 40, ""),
                    }
                }
            }
        }
        self.display.commit()
    }
}
