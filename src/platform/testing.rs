use std::collections::{BTreeMap, VecDeque};
use std::io;

use crate::platform::{ButtonInput, PowerControl, Screen, Tone};

/// Screen that keeps drawn text in a cell grid.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    cells: BTreeMap<(u16, u16), (char, Tone)>,
    pub clears: usize,
    pub draws: usize,
}

impl RecordingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of one row, unset cells rendered as spaces and trailing blanks trimmed.
    pub fn row(&self, row: u16) -> String {
        let mut line = String::new();
        for (&(r, col), &(ch, _)) in &self.cells {
            if r != row {
                continue;
            }
            while line.chars().count() < col as usize {
                line.push(' ');
            }
            line.push(ch);
        }
        line.trim_end().to_string()
    }

    pub fn contains(&self, needle: &str) -> bool {
        let last = self.cells.keys().map(|&(r, _)| r).max().unwrap_or(0);
        (0..=last).any(|r| self.row(r).contains(needle))
    }

    pub fn touched(&self) -> bool {
        self.clears > 0 || self.draws > 0
    }

    fn put(&mut self, col: u16, row: u16, tone: Tone, ch: char) {
        if tone == Tone::Erase {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), (ch, tone));
        }
    }
}

impl Screen for RecordingScreen {
    fn clear(&mut self) -> io::Result<()> {
        self.cells.clear();
        self.clears += 1;
        Ok(())
    }

    fn draw_text(&mut self, col: u16, row: u16, tone: Tone, text: &str) -> io::Result<()> {
        self.draws += 1;
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as u16, row, tone, ch);
        }
        Ok(())
    }

    fn draw_glyph(&mut self, col: u16, row: u16, tone: Tone, glyph: char) -> io::Result<()> {
        self.draws += 1;
        self.put(col, row, tone, glyph);
        Ok(())
    }
}

/// Plays back a fixed sequence of button masks, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedButtons {
    presses: VecDeque<u32>,
}

impl ScriptedButtons {
    pub fn new(presses: impl IntoIterator<Item = u32>) -> Self {
        Self {
            presses: presses.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.presses.len()
    }
}

impl ButtonInput for ScriptedButtons {
    fn wait_buttons(&mut self) -> io::Result<u32> {
        self.presses
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "button script exhausted"))
    }
}

/// Power control that unwinds instead of halting.
pub struct PanicPower;

impl PowerControl for PanicPower {
    fn power_off(&mut self) -> ! {
        panic!("power off requested");
    }
}
