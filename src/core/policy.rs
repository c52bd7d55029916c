use crate::error::{PinGateError, Result};
use crate::storage::format::{PinBlock, PIN_BLOCK_SIZE};

pub const MIN_LENGTH_LEVEL: u8 = 1;
pub const MAX_LENGTH_LEVEL: u8 = 3;

/// Number of symbols a PIN must have, resolved from a configured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinLength(u8);

impl PinLength {
    /// Level 1 is four symbols; each further level adds two.
    pub fn from_level(level: u8) -> Result<Self> {
        if !(MIN_LENGTH_LEVEL..=MAX_LENGTH_LEVEL).contains(&level) {
            return Err(PinGateError::InvalidLengthLevel(level));
        }
        Ok(Self(4 + 2 * (level - 1)))
    }

    pub fn symbols(self) -> usize {
        self.0 as usize
    }

    /// Canonical block hashed into the credential's length test vector.
    pub fn block(self) -> PinBlock {
        let mut block = [0u8; PIN_BLOCK_SIZE];
        block[0] = self.0;
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_map_to_lengths() {
        assert_eq!(PinLength::from_level(1).unwrap().symbols(), 4);
        assert_eq!(PinLength::from_level(2).unwrap().symbols(), 6);
        assert_eq!(PinLength::from_level(3).unwrap().symbols(), 8);
    }

    #[test]
    fn test_out_of_range_levels() {
        assert!(matches!(
            PinLength::from_level(0),
            Err(PinGateError::InvalidLengthLevel(0))
        ));
        assert!(matches!(
            PinLength::from_level(4),
            Err(PinGateError::InvalidLengthLevel(4))
        ));
    }

    #[test]
    fn test_length_block_encoding() {
        let block = PinLength::from_level(2).unwrap().block();
        assert_eq!(block[0], 6);
        assert!(block[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_longest_pin_fits_block() {
        let longest = PinLength::from_level(MAX_LENGTH_LEVEL).unwrap();
        assert!(longest.symbols() <= PIN_BLOCK_SIZE);
    }
}
