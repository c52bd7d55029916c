use tracing::{debug, info, warn};

use crate::core::alphabet::{self, BUTTON_SELECT, BUTTON_START, PIN_BUTTONS};
use crate::core::policy::PinLength;
use crate::core::session::InputSession;
use crate::core::FlowConfig;
use crate::crypto::pin_hash::{digests_match, PinHasher};
use crate::error::Result;
use crate::platform::{Peripherals, Tone};
use crate::storage::credential_file::CredentialStore;
use crate::storage::format::{MESSAGE_FILE, MESSAGE_MAX_LEN};
use crate::storage::BlockStorage;

const MASK_GLYPH: char = '*';

/// Result of an enrollment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Completed,
    Skipped,
}

/// Result of a verification run. A wrong PIN never ends the run; it only
/// returns once the right PIN is entered or no usable credential exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Granted,
    Absent,
}

/// Row and column placement of the prompt, shifted down below any operator
/// message.
#[derive(Debug, Clone, Copy)]
struct PromptLayout {
    top: u16,
}

impl PromptLayout {
    /// Width of "PIN (n digits): ".
    const ENTRY_PREFIX: u16 = 16;

    fn title_row(self) -> u16 {
        self.top
    }

    fn hint_row(self) -> u16 {
        self.top + 1
    }

    fn entry_row(self) -> u16 {
        self.top + 3
    }

    fn notice_row(self) -> u16 {
        self.top + 5
    }

    fn glyph_col(self, index: usize) -> u16 {
        Self::ENTRY_PREFIX + 2 * index as u16
    }
}

/// Runs the enroll and verify state machines against the device.
pub struct PinFlowController<'a, S, H> {
    store: CredentialStore<S>,
    hasher: H,
    io: Peripherals<'a>,
}

impl<'a, S: BlockStorage, H: PinHasher> PinFlowController<'a, S, H> {
    pub fn new(store: CredentialStore<S>, hasher: H, io: Peripherals<'a>) -> Self {
        Self { store, hasher, io }
    }

    /// Collect a new PIN and persist it, replacing any previous credential.
    ///
    /// START abandons enrollment when `allow_skipping` is set and nothing is
    /// written. SELECT clears the symbols typed so far. Storage failures are
    /// returned as errors and must halt the caller.
    pub fn enroll(&mut self, config: &FlowConfig) -> Result<EnrollOutcome> {
        let length = PinLength::from_level(config.length_level)?;
        let layout = PromptLayout { top: 0 };
        info!(
            symbols = length.symbols(),
            allow_skipping = config.allow_skipping,
            "enrolling new PIN"
        );

        let screen = &mut *self.io.screen;
        screen.clear()?;
        screen.draw_text(
            0,
            layout.title_row(),
            Tone::Title,
            "Enter a new PIN using ABXY and the DPad",
        )?;
        let hint = if config.allow_skipping {
            "Press START to skip, SELECT to reset"
        } else {
            "Press SELECT to reset"
        };
        screen.draw_text(0, layout.hint_row(), Tone::Title, hint)?;
        self.draw_entry_prompt(layout, length)?;

        let mut session = InputSession::new(length);
        while !session.is_full() {
            self.apply_reset(&mut session, layout)?;

            let mut pressed = self.wait_pin_buttons()?;
            if !config.allow_skipping {
                pressed &= !BUTTON_START;
            }

            if pressed & BUTTON_START != 0 {
                info!("PIN enrollment skipped");
                return Ok(EnrollOutcome::Skipped);
            }
            if pressed & BUTTON_SELECT != 0 {
                session.request_reset();
                continue;
            }
            let Some(symbol) = alphabet::decode(pressed) else {
                continue;
            };

            let index = session.push(symbol);
            self.io.screen.draw_glyph(
                layout.glyph_col(index),
                layout.entry_row(),
                Tone::Text,
                symbol as char,
            )?;
        }

        let digest = self.hasher.hash_block(session.block())?;
        self.store.save(length, digest, &self.hasher)?;
        info!("PIN enrolled");
        Ok(EnrollOutcome::Completed)
    }

    /// Ask for the enrolled PIN until it is entered correctly.
    ///
    /// Returns [`VerifyOutcome::Absent`] without drawing anything when there
    /// is no valid credential or it was enrolled for another length or
    /// device. START powers the device off from the prompt.
    pub fn verify(&mut self, config: &FlowConfig) -> Result<VerifyOutcome> {
        let length = PinLength::from_level(config.length_level)?;

        let Some(credential) = self.store.load() else {
            info!("no valid PIN credential");
            return Ok(VerifyOutcome::Absent);
        };

        // Test vector: catches a changed length or a record from another device.
        let length_digest = self.hasher.hash_block(&length.block())?;
        if !digests_match(&credential.length_hash, &length_digest) {
            info!("PIN length test vector mismatch");
            return Ok(VerifyOutcome::Absent);
        }

        self.io.screen.clear()?;
        let message_rows = self.draw_operator_message()?;
        let layout = PromptLayout {
            top: if message_rows == 0 { 0 } else { message_rows + 1 },
        };

        let screen = &mut *self.io.screen;
        screen.draw_text(
            0,
            layout.title_row(),
            Tone::Title,
            "Enter the PIN using ABXY and the DPad to proceed",
        )?;
        screen.draw_text(
            0,
            layout.hint_row(),
            Tone::Title,
            "Press START to shutdown, SELECT to clear",
        )?;
        self.draw_entry_prompt(layout, length)?;

        let mut session = InputSession::new(length);
        loop {
            self.apply_reset(&mut session, layout)?;

            let pressed = self.wait_pin_buttons()?;
            if pressed & BUTTON_START != 0 {
                info!("power off requested from PIN prompt");
                self.io.power.power_off();
            }
            if pressed & BUTTON_SELECT != 0 {
                session.request_reset();
                continue;
            }
            let Some(symbol) = alphabet::decode(pressed) else {
                continue;
            };

            let index = session.push(symbol);
            self.io.screen.draw_glyph(
                layout.glyph_col(index),
                layout.entry_row(),
                Tone::Text,
                MASK_GLYPH,
            )?;
            if !session.is_full() {
                continue;
            }

            let digest = self.hasher.hash_block(session.block())?;
            if digests_match(&credential.hash, &digest) {
                info!("PIN accepted");
                return Ok(VerifyOutcome::Granted);
            }

            warn!("wrong PIN entered");
            session.request_reset();
            self.io.screen.draw_text(
                0,
                layout.notice_row(),
                Tone::Warning,
                "Wrong PIN, try again",
            )?;
        }
    }

    fn draw_entry_prompt(&mut self, layout: PromptLayout, length: PinLength) -> Result<()> {
        let prompt = format!("PIN ({} digits): ", length.symbols());
        self.io
            .screen
            .draw_text(0, layout.entry_row(), Tone::Text, &prompt)?;
        Ok(())
    }

    /// Erase placeholders left by a pending reset.
    fn apply_reset(&mut self, session: &mut InputSession, layout: PromptLayout) -> Result<()> {
        if let Some(discarded) = session.take_reset() {
            for index in 0..discarded {
                self.io.screen.draw_glyph(
                    layout.glyph_col(index),
                    layout.entry_row(),
                    Tone::Erase,
                    ' ',
                )?;
            }
        }
        Ok(())
    }

    /// Block until a press includes a PIN button; other buttons are masked off.
    fn wait_pin_buttons(&mut self) -> Result<u32> {
        loop {
            let pressed = self.io.buttons.wait_buttons()? & PIN_BUTTONS;
            if pressed != 0 {
                return Ok(pressed);
            }
        }
    }

    /// Draw the optional reminder file verbatim. Returns the rows used.
    fn draw_operator_message(&mut self) -> Result<u16> {
        let data = match self.store.storage().read_file(MESSAGE_FILE, MESSAGE_MAX_LEN) {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "no operator message");
                return Ok(0);
            }
        };

        let text = String::from_utf8_lossy(&data);
        let mut rows = 0;
        for line in text.lines() {
            self.io.screen.draw_text(0, rows, Tone::Text, line)?;
            rows += 1;
        }
        Ok(rows)
    }
}
