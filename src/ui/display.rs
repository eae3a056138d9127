//! SH1106 OLED display wrapper.
//!
//! Implements [`DisplaySurface`](crate::ui::DisplaySurface) on top of
//! the buffered sh1106 driver: `clear` and `draw_line` only touch the
//! frame buffer, `commit` flushes it over I²C.

use crate::error::Error;
use crate::ui::DisplaySurface;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use sh1106::interface::I2cInterface;
use sh1106::mode::GraphicsMode;
use sh1106::Builder;

/// Buffered SH1106 128×64 panel over I²C.
pub struct OledDisplay<I2C> {
    display: GraphicsMode<I2cInterface<I2C>>,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the panel and show a blank screen.
    pub fn new(i2c: I2C) -> Result<Self, Error> {
        let mut display: GraphicsMode<_> = Builder::new().connect_i2c(i2c).into();
        display.init().map_err(|_| Error::Display)?;
        display.clear();
        display.flush().map_err(|_| Error::Display)?;
        Ok(Self { display })
    }

    fn text_style() -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .build()
    }
}

impl<I2C> DisplaySurface for OledDisplay<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) {
        self.display.clear();
    }

    fn draw_line(&mut self, x: i32, y: i32, text: &str) {
        let _ = Text::new(text, Point::new(x, y), Self::text_style()).draw(&mut self.display);
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.display.flush().map_err(|_| Error::Display)
    }
}
