//! Discrete key input (4×4 matrix keypad) and the rotary position source.
//!
//! The hardware drivers behind these traits own debouncing and signal
//! filtering; the logic core only sees at most one clean key symbol per
//! polling cycle and an already-filtered position sample.

#[cfg(feature = "embedded")]
pub mod keypad;
#[cfg(feature = "embedded")]
pub mod rotary;

/// One debounced key symbol from the 16-key pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Digit keys `0`-`9`.
    Digit(u8),
    A,
    B,
    C,
    D,
    Star,
    Hash,
}

impl Key {
    /// Decode a keypad label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Key::Digit(c as u8 - b'0')),
            'A' => Some(Key::A),
            'B' => Some(Key::B),
            'C' => Some(Key::C),
            'D' => Some(Key::D),
            '*' => Some(Key::Star),
            '#' => Some(Key::Hash),
            _ => None,
        }
    }
}

/// Source of at most one key symbol per polling cycle.
pub trait KeyInput {
    fn poll(&mut self) -> Option<Key>;
}

/// Filtered rotary position source in `[0, ADC_MAX]`.
pub trait RotaryInput {
    fn poll(&mut self) -> u16;
}
