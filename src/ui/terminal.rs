use std::collections::BTreeMap;
use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tracing::info;

use crate::core::alphabet::{
    BUTTON_A, BUTTON_B, BUTTON_DOWN, BUTTON_L, BUTTON_LEFT, BUTTON_R, BUTTON_RIGHT,
    BUTTON_SELECT, BUTTON_START, BUTTON_UP, BUTTON_X, BUTTON_Y,
};
use crate::platform::{ButtonInput, PowerControl, Screen, Tone};
use crate::ui::theme;

/// Process exit status used when the prompt powers the device off.
pub const POWER_OFF_EXIT_CODE: i32 = 3;

const KEY_LEGEND: &str = "a b x y: buttons  arrows: DPad  Enter: START  Backspace: SELECT";

type Canvas = BTreeMap<(u16, u16), (char, Tone)>;

/// Character-cell [`Screen`] redrawn through ratatui after every change.
pub struct TerminalScreen<B: Backend> {
    terminal: Terminal<B>,
    cells: Canvas,
}

impl<B: Backend> TerminalScreen<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            cells: Canvas::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn put(&mut self, col: u16, row: u16, tone: Tone, ch: char) {
        if tone == Tone::Erase {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), (ch, tone));
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let cells = &self.cells;
        self.terminal.draw(|frame| render_canvas(frame, cells))?;
        Ok(())
    }
}

impl<B: Backend> Screen for TerminalScreen<B> {
    fn clear(&mut self) -> io::Result<()> {
        self.cells.clear();
        self.present()
    }

    fn draw_text(&mut self, col: u16, row: u16, tone: Tone, text: &str) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.put(col.saturating_add(i as u16), row, tone, ch);
        }
        self.present()
    }

    fn draw_glyph(&mut self, col: u16, row: u16, tone: Tone, glyph: char) -> io::Result<()> {
        self.put(col, row, tone, glyph);
        self.present()
    }
}

fn render_canvas(frame: &mut Frame, cells: &Canvas) {
    let [canvas_area, legend_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default()
        .title(" pingate ")
        .borders(Borders::ALL)
        .border_style(theme::style_border());
    let inner = block.inner(canvas_area);
    frame.render_widget(block, canvas_area);

    let buf = frame.buffer_mut();
    for (&(row, col), &(ch, tone)) in cells {
        // Cells past the panel edge are clipped.
        if col >= inner.width || row >= inner.height {
            continue;
        }
        if let Some(cell) = buf.cell_mut((inner.x + col, inner.y + row)) {
            cell.set_char(ch).set_style(theme::style_for(tone));
        }
    }

    let legend = Paragraph::new(KEY_LEGEND)
        .alignment(Alignment::Center)
        .style(theme::style_muted());
    frame.render_widget(legend, legend_area);
}

/// Keyboard stand-in for the device keypad.
pub struct KeyboardButtons;

impl ButtonInput for KeyboardButtons {
    fn wait_buttons(&mut self) -> io::Result<u32> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(button) = button_for_key(key) {
                    return Ok(button);
                }
            }
        }
    }
}

pub fn button_for_key(key: KeyEvent) -> Option<u32> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(BUTTON_START),
        (KeyCode::Char('a' | 'A'), _) => Some(BUTTON_A),
        (KeyCode::Char('b' | 'B'), _) => Some(BUTTON_B),
        (KeyCode::Char('x' | 'X'), _) => Some(BUTTON_X),
        (KeyCode::Char('y' | 'Y'), _) => Some(BUTTON_Y),
        (KeyCode::Char('l' | 'L'), _) => Some(BUTTON_L),
        (KeyCode::Char('r' | 'R'), _) => Some(BUTTON_R),
        (KeyCode::Up, _) => Some(BUTTON_UP),
        (KeyCode::Down, _) => Some(BUTTON_DOWN),
        (KeyCode::Left, _) => Some(BUTTON_LEFT),
        (KeyCode::Right, _) => Some(BUTTON_RIGHT),
        (KeyCode::Enter, _) => Some(BUTTON_START),
        (KeyCode::Backspace, _) => Some(BUTTON_SELECT),
        _ => None,
    }
}

/// Restores the terminal and ends the process.
pub struct TerminalPower;

impl PowerControl for TerminalPower {
    fn power_off(&mut self) -> ! {
        info!("powering off");
        ratatui::restore();
        std::process::exit(POWER_OFF_EXIT_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn screen() -> TerminalScreen<TestBackend> {
        TerminalScreen::new(Terminal::new(TestBackend::new(60, 12)).unwrap())
    }

    fn symbol_at(screen: &TerminalScreen<TestBackend>, col: u16, row: u16) -> String {
        // +1 for the panel border.
        screen.terminal().backend().buffer()[(col + 1, row + 1)]
            .symbol()
            .to_string()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_text_lands_on_grid() {
        let mut screen = screen();
        screen.draw_text(0, 0, Tone::Title, "PIN").unwrap();
        screen.draw_glyph(16, 3, Tone::Text, '*').unwrap();

        assert_eq!(symbol_at(&screen, 0, 0), "P");
        assert_eq!(symbol_at(&screen, 2, 0), "N");
        assert_eq!(symbol_at(&screen, 16, 3), "*");
    }

    #[test]
    fn test_erase_blanks_cell() {
        let mut screen = screen();
        screen.draw_glyph(16, 3, Tone::Text, 'A').unwrap();
        screen.draw_glyph(16, 3, Tone::Erase, 'A').unwrap();

        assert_eq!(symbol_at(&screen, 16, 3), " ");
    }

    #[test]
    fn test_clear_empties_canvas() {
        let mut screen = screen();
        screen.draw_text(0, 1, Tone::Warning, "Wrong PIN").unwrap();
        screen.clear().unwrap();

        assert_eq!(symbol_at(&screen, 0, 1), " ");
    }

    #[test]
    fn test_offscreen_text_is_clipped() {
        let mut screen = screen();
        screen.draw_text(50, 0, Tone::Text, "0123456789abcdef").unwrap();
        screen.draw_glyph(0, 40, Tone::Text, 'Z').unwrap();

        assert_eq!(symbol_at(&screen, 50, 0), "0");
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(button_for_key(key(KeyCode::Char('a'))), Some(BUTTON_A));
        assert_eq!(button_for_key(key(KeyCode::Char('Y'))), Some(BUTTON_Y));
        assert_eq!(button_for_key(key(KeyCode::Up)), Some(BUTTON_UP));
        assert_eq!(button_for_key(key(KeyCode::Right)), Some(BUTTON_RIGHT));
        assert_eq!(button_for_key(key(KeyCode::Enter)), Some(BUTTON_START));
        assert_eq!(button_for_key(key(KeyCode::Backspace)), Some(BUTTON_SELECT));
        assert_eq!(button_for_key(key(KeyCode::Char('q'))), None);
        assert_eq!(button_for_key(key(KeyCode::Tab)), None);
    }

    #[test]
    fn test_ctrl_c_is_power_button() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(button_for_key(ctrl_c), Some(BUTTON_START));
    }
}
