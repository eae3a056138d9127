//! Rotary-position to character mapping with dummy-slot hysteresis.
//!
//! A continuous 12-bit sample maps onto a 37-character alphabet, so a
//! jittery reading near a character boundary would flicker the selection.
//! The valid range is therefore subdivided into real slots separated by
//! dummy slots: the committed character only changes when the mapped
//! position lands exactly on a real slot.

use crate::config::{ADC_MAX, ALPHABET, DUMMY_SLOTS};

/// Number of characters in the selector alphabet.
pub const ALPHABET_LEN: usize = ALPHABET.len();

/// Virtual slots the raw range maps onto: one real slot per character
/// with `DUMMY_SLOTS` buffer slots between each adjacent pair.
pub const TOTAL_SLOTS: usize = ALPHABET_LEN * (DUMMY_SLOTS + 1) - DUMMY_SLOTS;

/// Debounced character selector driven by filtered rotary samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharSelector {
    raw: u16,
    candidate: usize,
    committed: usize,
}

impl CharSelector {
    /// Start at the first alphabet character.
    pub const fn new() -> Self {
        Self {
            raw: 0,
            candidate: 0,
            committed: 0,
        }
    }

    /// Feed one filtered rotary sample in `[0, ADC_MAX]`.
    ///
    /// The candidate index tracks every sample; the committed index only
    /// moves when the sample lands on a real slot (`remainder == 0`)
    /// that differs from the current commitment.
    pub fn update(&mut self, raw: u16) {
        let raw = raw.min(ADC_MAX);
        let virtual_index = raw as usize * (TOTAL_SLOTS - 1) / ADC_MAX as usize;
        let real = virtual_index / (DUMMY_SLOTS + 1);
        let remainder = virtual_index % (DUMMY_SLOTS + 1);

        self.raw = raw;
        self.candidate = real;
        if remainder == 0 && real != self.committed {
            self.committed = real;
        }
    }

    /// Last raw sample fed in.
    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Per-cycle candidate index (not debounced).
    pub fn candidate_index(&self) -> usize {
        self.candidate
    }

    /// Stabilised selection index.
    pub fn committed_index(&self) -> usize {
        self.committed
    }

    /// Stabilised selection as the character it maps to.
    pub fn committed_char(&self) -> char {
        ALPHABET.as_bytes()[self.committed] as char
    }
}

impl Default for CharSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw sample whose mapped position is the real slot of `index`.
/// Test helper mirroring the inverse of the mapping in `update`.
#[cfg(test)]
pub(crate) fn raw_for_index(index: usize) -> u16 {
    let virtual_index = index * (DUMMY_SLOTS + 1);
    // Smallest raw value that truncates onto this virtual slot.
    let raw = (virtual_index * ADC_MAX as usize).div_ceil(TOTAL_SLOTS - 1);
    raw as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_layout_matches_alphabet() {
        assert_eq!(ALPHABET_LEN, 37);
        assert_eq!(TOTAL_SLOTS, 145);
    }

    #[test]
    fn extremes_map_to_first_and_last_char() {
        let mut sel = CharSelector::new();
        sel.update(0);
        assert_eq!(sel.committed_char(), 'A');
        sel.update(ADC_MAX);
        assert_eq!(sel.committed_char(), ' ');
        assert_eq!(sel.committed_index(), ALPHABET_LEN - 1);
    }

    #[test]
    fn commits_each_letter_at_its_real_slot() {
        let mut sel = CharSelector::new();
        for (i, expected) in ALPHABET.chars().enumerate() {
            sel.update(raw_for_index(i));
            assert_eq!(sel.committed_char(), expected, "index {i}");
        }
    }

    #[test]
    fn monotone_sweep_commits_non_decreasing_indices() {
        let mut sel = CharSelector::new();
        let mut last = 0;
        for raw in 0..=ADC_MAX {
            sel.update(raw);
            assert!(sel.committed_index() >= last);
            last = sel.committed_index();
        }
        assert_eq!(last, ALPHABET_LEN - 1);
    }

    #[test]
    fn jitter_inside_dummy_band_does_not_flicker() {
        let mut sel = CharSelector::new();
        sel.update(raw_for_index(1)); // commit 'B'

        // Oscillate across the B/C boundary without touching a real slot:
        // virtual slots 5..=7 are all dummies between B (4) and C (8).
        let low = raw_for_index(1) + 40; // lands in B's dummy band
        let high = raw_for_index(2) - 40; // still short of C's real slot
        for _ in 0..20 {
            sel.update(low);
            assert_eq!(sel.committed_char(), 'B');
            sel.update(high);
            assert_eq!(sel.committed_char(), 'B');
        }

        sel.update(raw_for_index(2));
        assert_eq!(sel.committed_char(), 'C');
    }

    #[test]
    fn candidate_tracks_every_sample() {
        let mut sel = CharSelector::new();
        let dummy = raw_for_index(3) + 40; // inside D's dummy band
        sel.update(dummy);
        assert_eq!(sel.candidate_index(), 3);
        assert_eq!(sel.committed_index(), 0);
    }

    #[test]
    fn out_of_range_sample_is_clamped() {
        let mut sel = CharSelector::new();
        sel.update(u16::MAX);
        assert_eq!(sel.committed_index(), ALPHABET_LEN - 1);
    }
}
