//! Display surface contract and shared view formatting.
//!
//! The dispatcher drives any line-oriented text sink through
//! [`DisplaySurface`] in a fixed pattern: `clear` → one or more
//! `draw_line` → `commit`. Geometry beyond (x, y) text placement is the
//! sink's business; the embedded implementation is an SH1106 OLED.

#[cfg(feature = "embedded")]
pub mod display;
#[cfg(feature = "embedded")]
pub use display::OledDisplay;

use crate::error::Error;
use heapless::String;

/// Line-oriented display sink.
pub trait DisplaySurface {
    /// Reset the frame under construction.
    fn clear(&mut self);

    /// Place one line of text at pixel position (x, y).
    fn draw_line(&mut self, x: i32, y: i32, text: &str);

    /// Push the assembled frame to the panel.
    fn commit(&mut self) -> Result<(), Error>;
}

/// Printable label for the currently selected character. Space would be
/// invisible on screen, so it gets an explicit marker.
pub fn selected_label(c: char) -> String<8> {
    let mut s: String<8> = String::new();
    if c == ' ' {
        let _ = s.push_str("[SPACE]");
    } else {
        let _ = s.push(c);
    }
    s
}
