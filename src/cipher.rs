//! Fixed-shift substitution cipher applied symmetrically on send and
//! receive.
//!
//! This is an obfuscation layer shared by the two paired devices, not a
//! security mechanism. Only uppercase letters and digits are rotated;
//! everything else (space, punctuation, lowercase) passes through
//! unchanged, so `decrypt(encrypt(s)) == s` holds for every input.

use crate::config::MAX_MESSAGE_LEN;
use heapless::String;

/// Stateless shift-substitution transform over letters and digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cipher {
    shift: u8,
}

impl Cipher {
    /// Create a cipher with the given shift. Both peers must use the
    /// same value.
    pub const fn new(shift: u8) -> Self {
        Self { shift }
    }

    /// Encrypt a message. Output is truncated to the message capacity,
    /// which the compose buffer already guarantees.
    pub fn encrypt(&self, text: &str) -> String<MAX_MESSAGE_LEN> {
        self.transform(text, true)
    }

    /// Decrypt a message previously produced by [`Cipher::encrypt`]
    /// with the same shift.
    pub fn decrypt(&self, text: &str) -> String<MAX_MESSAGE_LEN> {
        self.transform(text, false)
    }

    fn transform(&self, text: &str, forward: bool) -> String<MAX_MESSAGE_LEN> {
        let mut out: String<MAX_MESSAGE_LEN> = String::new();
        for c in text.chars() {
            let shifted = if forward {
                shift_forward(c, self.shift)
            } else {
                shift_back(c, self.shift)
            };
            let _ = out.push(shifted);
        }
        out
    }
}

impl Default for Cipher {
    fn default() -> Self {
        Self::new(crate::config::CIPHER_SHIFT)
    }
}

fn shift_forward(c: char, k: u8) -> char {
    match c {
        'A'..='Z' => ((c as u8 - b'A' + k % 26) % 26 + b'A') as char,
        '0'..='9' => ((c as u8 - b'0' + k % 10) % 10 + b'0') as char,
        _ => c,
    }
}

fn shift_back(c: char, k: u8) -> char {
    match c {
        // +26/+10 before the modulo keeps the subtraction non-negative.
        'A'..='Z' => ((c as u8 - b'A' + 26 - k % 26) % 26 + b'A') as char,
        '0'..='9' => ((c as u8 - b'0' + 10 - k % 10) % 10 + b'0') as char,
        _ => c,
    }
}
