//! 4×4 matrix keypad scanner.
//!
//! Rows are driven low one at a time; columns idle high through
//! pull-ups and read low when the key at the scanned intersection is
//! pressed. Debouncing is edge-based: a key is reported once per press
//! and not again until every contact has been released.

use crate::input::{Key, KeyInput};
use defmt::debug;
use esp_hal::gpio::{Input, Level, Output};

/// Keypad label layout, row-major, matching the wiring in `config.rs`.
const KEY_LAYOUT: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Matrix keypad on 4 row outputs and 4 column inputs.
pub struct MatrixKeypad<'d> {
    rows: [Output<'d>; 4],
    cols: [Input<'d>; 4],
    held: bool,
}

impl<'d> MatrixKeypad<'d> {
    pub fn new(rows: [Output<'d>; 4], cols: [Input<'d>; 4]) -> Self {
        Self {
            rows,
            cols,
            held: false,
        }
    }

    /// Scan the matrix once, returning the first pressed key found.
    fn scan(&mut self) -> Option<Key> {
        let mut pressed = None;
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_level(Level::Low);
            for (c, col) in self.cols.iter().enumerate() {
                if col.is_low() && pressed.is_none() {
                    pressed = Key::from_char(KEY_LAYOUT[r][c]);
                }
            }
            row.set_level(Level::High);
        }
        pressed
    }
}

impl KeyInput for MatrixKeypad<'_> {
    /// At most one key symbol per polling cycle, on the press edge.
    fn poll(&mut self) -> Option<Key> {
        match self.scan() {
            Some(key) if !self.held => {
                self.held = true;
                debug!("keypad: {:?}", key);
                Some(key)
            }
            Some(_) => None,
            None => {
                self.held = false;
                None
            }
        }
    }
}
