use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::policy::PinLength;
use crate::storage::format::{PinBlock, PIN_BLOCK_SIZE};

/// Symbols typed during one enroll or verify attempt.
///
/// The buffer is a full zero-padded block so it can be hashed as-is once
/// the cursor reaches the required length. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct InputSession {
    block: PinBlock,
    cursor: usize,
    required: usize,
    reset: bool,
}

impl InputSession {
    pub fn new(length: PinLength) -> Self {
        Self {
            block: [0u8; PIN_BLOCK_SIZE],
            cursor: 0,
            required: length.symbols(),
            reset: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_full(&self) -> bool {
        self.cursor >= self.required
    }

    /// Store a symbol at the cursor and return the index it landed on.
    pub fn push(&mut self, symbol: u8) -> usize {
        debug_assert!(!self.is_full());
        let index = self.cursor;
        self.block[index] = symbol;
        self.cursor += 1;
        index
    }

    /// Mark the session for clearing before the next keypress is read.
    pub fn request_reset(&mut self) {
        self.reset = true;
    }

    /// Apply a pending reset. Returns how many symbols were discarded so the
    /// caller can erase their placeholders.
    pub fn take_reset(&mut self) -> Option<usize> {
        if !self.reset {
            return None;
        }
        let discarded = self.cursor;
        self.block.zeroize();
        self.cursor = 0;
        self.reset = false;
        Some(discarded)
    }

    pub fn block(&self) -> &PinBlock {
        &self.block
    }
}
