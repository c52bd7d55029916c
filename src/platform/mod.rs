//! Device primitives the PIN flows drive.

#[cfg(test)]
pub mod testing;

use std::io;

/// How a piece of text is drawn. [`Tone::Erase`] blanks the cells instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Title,
    Text,
    Warning,
    Erase,
}

/// Character-grid display. Coordinates are (column, row) cells.
pub trait Screen {
    fn clear(&mut self) -> io::Result<()>;
    fn draw_text(&mut self, col: u16, row: u16, tone: Tone, text: &str) -> io::Result<()>;
    fn draw_glyph(&mut self, col: u16, row: u16, tone: Tone, glyph: char) -> io::Result<()>;
}

/// Physical buttons, reported as a bitmask of `core::alphabet` bits.
pub trait ButtonInput {
    /// Block until at least one button is pressed and return the mask.
    fn wait_buttons(&mut self) -> io::Result<u32>;
}

pub trait PowerControl {
    /// Halt the device. Never returns.
    fn power_off(&mut self) -> !;
}

/// Borrowed device handles for the duration of one flow.
pub struct Peripherals<'a> {
    pub screen: &'a mut dyn Screen,
    pub buttons: &'a mut dyn ButtonInput,
    pub power: &'a mut dyn PowerControl,
}
