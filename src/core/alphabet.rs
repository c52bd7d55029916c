//! Keypad button bits and the symbol alphabet they decode to.

pub const BUTTON_A: u32 = 1 << 0;
pub const BUTTON_B: u32 = 1 << 1;
pub const BUTTON_SELECT: u32 = 1 << 2;
pub const BUTTON_START: u32 = 1 << 3;
pub const BUTTON_RIGHT: u32 = 1 << 4;
pub const BUTTON_LEFT: u32 = 1 << 5;
pub const BUTTON_UP: u32 = 1 << 6;
pub const BUTTON_DOWN: u32 = 1 << 7;
pub const BUTTON_R: u32 = 1 << 8;
pub const BUTTON_L: u32 = 1 << 9;
pub const BUTTON_X: u32 = 1 << 10;
pub const BUTTON_Y: u32 = 1 << 11;

pub const DPAD_BUTTONS: u32 = BUTTON_RIGHT | BUTTON_LEFT | BUTTON_UP | BUTTON_DOWN;

/// Buttons that enter a PIN symbol.
pub const SYMBOL_BUTTONS: u32 = BUTTON_A | BUTTON_B | BUTTON_X | BUTTON_Y | DPAD_BUTTONS;

/// Every button the PIN prompts react to.
pub const PIN_BUTTONS: u32 = SYMBOL_BUTTONS | BUTTON_START | BUTTON_SELECT;

/// Indexed by button bit position. `-` marks bits that never decode.
const ALPHABET: &[u8; 12] = b"AB--RLUD--XY";

/// Map a single symbol-button bit to its alphabet byte.
///
/// The mask must hold exactly one bit from [`SYMBOL_BUTTONS`]; callers filter
/// with [`decode`] first.
pub fn symbol_for(pressed: u32) -> u8 {
    debug_assert!(pressed.count_ones() == 1 && pressed & SYMBOL_BUTTONS != 0);
    ALPHABET[pressed.trailing_zeros() as usize]
}

/// Checked decode: `None` unless exactly one symbol button is held.
pub fn decode(pressed: u32) -> Option<u8> {
    if pressed.count_ones() == 1 && pressed & SYMBOL_BUTTONS != 0 {
        Some(symbol_for(pressed))
    } else {
        None
    }
}
