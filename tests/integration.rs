//! Integration tests for the pagerlink host-testable logic.
//!
//! Drives the full pipeline - dispatcher, session, selector, cipher,
//! history - through the public API with scripted inputs and fakes for
//! the hardware collaborators.

use pagerlink::config::{ADC_MAX, DUMMY_SLOTS, SEND_HOLD_MS, TOGGLE_COOLDOWN_MS};
use pagerlink::error::{Error, LinkError};
use pagerlink::input::{Key, KeyInput, RotaryInput};
use pagerlink::link::{OfflineLink, PeerLink};
use pagerlink::selector::TOTAL_SLOTS;
use pagerlink::storage::MemStore;
use pagerlink::ui::DisplaySurface;
use pagerlink::{Direction, Dispatcher, Mode, Session};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Raw rotary sample whose mapped position is the real slot of `index`.
fn raw_for_index(index: usize) -> u16 {
    let virtual_index = index * (DUMMY_SLOTS + 1);
    (virtual_index * ADC_MAX as usize).div_ceil(TOTAL_SLOTS - 1) as u16
}

#[derive(Default)]
struct FakeDisplay {
    lines: Vec<String>,
}

impl DisplaySurface for FakeDisplay {
    fn clear(&mut self) {
        self.lines.clear();
    }
    fn draw_line(&mut self, _x: i32, _y: i32, text: &str) {
        self.lines.push(text.to_string());
    }
    fn commit(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

#[derive(Default)]
struct Script {
    keys: VecDeque<Option<Key>>,
    rotary: VecDeque<u16>,
}

struct ScriptKeys(Rc<RefCell<Script>>);
struct ScriptRotary(Rc<RefCell<Script>>);

impl KeyInput for ScriptKeys {
    fn poll(&mut self) -> Option<Key> {
        self.0.borrow_mut().keys.pop_front().flatten()
    }
}

impl RotaryInput for ScriptRotary {
    fn poll(&mut self) -> u16 {
        let mut script = self.0.borrow_mut();
        script.rotary.pop_front().unwrap_or(0)
    }
}

/// Link recording every transmitted frame into a shared log.
#[derive(Clone, Default)]
struct SpyLink {
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl PeerLink for SpyLink {
    fn send(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.frames.borrow_mut().push(frame.to_vec());
        Ok(())
    }
}

struct Rig {
    dispatcher: Dispatcher<MemStore, SpyLink, FakeDisplay, ScriptKeys, ScriptRotary>,
    script: Rc<RefCell<Script>>,
    frames: Rc<RefCell<Vec<Vec<u8>>>>,
    now_ms: u64,
}

impl Rig {
    fn new() -> Self {
        let script = Rc::new(RefCell::new(Script::default()));
        let link = SpyLink::default();
        let frames = Rc::clone(&link.frames);
        let session = Session::new(MemStore::new(), link);
        let dispatcher = Dispatcher::new(
            session,
            FakeDisplay::default(),
            ScriptKeys(Rc::clone(&script)),
            ScriptRotary(Rc::clone(&script)),
        );
        Self {
            dispatcher,
            script,
            frames,
            now_ms: 0,
        }
    }

    /// Queue one cycle's inputs and run it, advancing time enough to
    /// outlast any hold window.
    fn cycle(&mut self, key: Option<Key>, rotary: u16) {
        {
            let mut script = self.script.borrow_mut();
            script.keys.push_back(key);
            script.rotary.push_back(rotary);
        }
        self.now_ms += SEND_HOLD_MS + TOGGLE_COOLDOWN_MS;
        self.dispatcher.run_cycle(self.now_ms).unwrap();
    }

    /// Select a character on the rotary, then confirm it with `0`.
    fn type_char(&mut self, index: usize) {
        let raw = raw_for_index(index);
        self.cycle(None, raw);
        self.cycle(Some(Key::Digit(0)), raw);
    }

    fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.frames.borrow().clone()
    }
}

#[test]
fn typed_message_is_encrypted_on_the_wire() {
    let mut rig = Rig::new();
    rig.type_char(7); // H
    rig.type_char(8); // I
    assert_eq!(rig.dispatcher.session().buffer(), "HI");

    rig.cycle(Some(Key::Hash), raw_for_index(8));

    // Shift-3 ciphertext plus the frame terminator.
    assert_eq!(rig.sent_frames(), vec![b"KL\0".to_vec()]);
    assert_eq!(rig.dispatcher.session().buffer(), "");
    let rec = rig.dispatcher.session().history().load(0).unwrap();
    assert_eq!(rec.direction, Direction::Sent);
    assert_eq!(rec.text.as_str(), "HI");
}

#[test]
fn received_ciphertext_is_decrypted_and_recorded() {
    let mut rig = Rig::new();
    assert!(rig.dispatcher.push_incoming(b"KL\0"));
    rig.cycle(None, 0);

    let rec = rig.dispatcher.session().history().load(0).unwrap();
    assert_eq!(rec.direction, Direction::Received);
    assert_eq!(rec.text.as_str(), "HI");
    assert_eq!(rig.dispatcher.session().mode(), Mode::Typing);
}

#[test]
fn send_and_receive_roundtrip_between_two_devices() {
    let mut alice = Rig::new();
    let mut bob = Rig::new();

    alice.type_char(7); // H
    alice.type_char(8); // I
    alice.cycle(Some(Key::Hash), 0);

    for frame in alice.sent_frames() {
        assert!(bob.dispatcher.push_incoming(&frame));
    }
    bob.cycle(None, 0);

    let rec = bob.dispatcher.session().history().load(0).unwrap();
    assert_eq!(rec.text.as_str(), "HI");
    assert_eq!(rec.direction, Direction::Received);
}

#[test]
fn empty_buffer_send_produces_no_frame() {
    let mut rig = Rig::new();
    rig.cycle(Some(Key::Hash), 0);
    assert!(rig.sent_frames().is_empty());
    assert_eq!(rig.dispatcher.session().history().count(), 0);
}

#[test]
fn mode_toggle_roundtrip_preserves_composition() {
    let mut rig = Rig::new();
    rig.type_char(0); // A
    rig.type_char(1); // B
    rig.cycle(Some(Key::D), 0);
    assert_eq!(rig.dispatcher.session().mode(), Mode::History);
    rig.cycle(Some(Key::D), 0);
    assert_eq!(rig.dispatcher.session().mode(), Mode::Typing);
    assert_eq!(rig.dispatcher.session().buffer(), "AB");
}

#[test]
fn history_navigation_walks_sent_and_received_records() {
    let mut rig = Rig::new();
    rig.type_char(7); // H
    rig.cycle(Some(Key::Hash), 0);
    rig.dispatcher.push_incoming(b"KL\0");
    rig.cycle(None, 0);

    rig.cycle(Some(Key::D), 0); // history mode, cursor on newest
    let history = rig.dispatcher.session().history();
    assert_eq!(history.count(), 2);
    assert_eq!(history.cursor(), 1);
    assert_eq!(history.current().unwrap().direction, Direction::Received);

    rig.cycle(Some(Key::A), 0); // back to the sent record
    let history = rig.dispatcher.session().history();
    assert_eq!(history.cursor(), 0);
    assert_eq!(history.current().unwrap().direction, Direction::Sent);

    rig.cycle(Some(Key::C), 0); // bulk clear
    assert_eq!(rig.dispatcher.session().history().count(), 0);
}

#[test]
fn offline_device_keeps_draft_and_flags_state() {
    let session = Session::new(MemStore::new(), OfflineLink);
    let script = Rc::new(RefCell::new(Script::default()));
    let mut dispatcher = Dispatcher::new(
        session,
        FakeDisplay::default(),
        ScriptKeys(Rc::clone(&script)),
        ScriptRotary(Rc::clone(&script)),
    );

    // Type 'H' and try to send; every cycle leaves the hold windows.
    let raw = raw_for_index(7);
    let mut now = 0;
    for key in [None, Some(Key::Digit(0)), Some(Key::Hash), None] {
        {
            let mut s = script.borrow_mut();
            s.keys.push_back(key);
            s.rotary.push_back(raw);
        }
        now += SEND_HOLD_MS + TOGGLE_COOLDOWN_MS;
        dispatcher.run_cycle(now).unwrap();
    }

    // Transport failed: draft retained, nothing recorded.
    assert_eq!(dispatcher.session().buffer(), "H");
    assert_eq!(dispatcher.session().history().count(), 0);
    assert!(!dispatcher.session().link_ready());
}
