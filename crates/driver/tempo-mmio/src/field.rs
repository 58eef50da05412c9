//! Named bit ranges within a 32-bit register.

/// A contiguous bit range (`offset..offset + width`) inside a register word.
///
/// Used for multi-bit fields such as prescaler selectors and interrupt
/// priority groups, where a bitflags type only describes single bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    offset: u8,
    width: u8,
}

impl Field {
    /// Creates a field of `width` bits starting at bit `offset`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if the range does not
    /// fit in 32 bits or is empty.
    #[must_use]
    pub const fn new(offset: u8, width: u8) -> Self {
        assert!(width > 0 && width <= 32, "field width must be 1..=32");
        assert!(
            offset as u32 + width as u32 <= 32,
            "field exceeds register width"
        );
        Self { offset, width }
    }

    /// Returns the bit offset of the field.
    #[must_use]
    pub const fn offset(self) -> u8 {
        self.offset
    }

    /// Returns the width of the field in bits.
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Returns the largest value the field can hold.
    #[must_use]
    pub const fn max_value(self) -> u32 {
        if self.width == 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Returns the in-place mask of the field.
    #[must_use]
    pub const fn mask(self) -> u32 {
        self.max_value() << self.offset
    }

    /// Extracts the field value from a register word.
    #[must_use]
    pub const fn extract(self, word: u32) -> u32 {
        (word & self.mask()) >> self.offset
    }

    /// Returns `value` shifted into place. Bits beyond the width are dropped.
    #[must_use]
    pub const fn place(self, value: u32) -> u32 {
        (value & self.max_value()) << self.offset
    }

    /// Returns `word` with the field replaced by `value`.
    #[must_use]
    pub const fn insert(self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | self.place(value)
    }

    /// Returns the field placed at `offset + shift` instead of `offset`.
    ///
    /// Interrupt priority registers pack one identical field per source at a
    /// per-source bit position; this builds the field for one source.
    #[must_use]
    pub const fn shifted(self, shift: u8) -> Self {
        Self::new(self.offset + shift, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCKPS: Field = Field::new(4, 3);

    #[test]
    fn mask_and_extract() {
        assert_eq!(TCKPS.mask(), 0b0111_0000);
        assert_eq!(TCKPS.extract(0b1101_0101), 0b101);
    }

    #[test]
    fn insert_preserves_other_bits() {
        let word = 0x8000_0008;
        assert_eq!(TCKPS.insert(word, 0b011), 0x8000_0038);
    }

    #[test]
    fn place_truncates_to_width() {
        assert_eq!(TCKPS.place(0xFF), 0b0111_0000);
    }

    #[test]
    fn full_width_field() {
        let word = Field::new(0, 32);
        assert_eq!(word.mask(), u32::MAX);
        assert_eq!(word.extract(0xDEAD_BEEF), 0xDEAD_BEEF);
    }

    #[test]
    fn shifted_moves_the_field() {
        let priority = Field::new(0, 5).shifted(8);
        assert_eq!(priority.offset(), 8);
        assert_eq!(priority.mask(), 0x1F00);
    }

    #[test]
    #[should_panic(expected = "field exceeds register width")]
    fn oversized_field_panics() {
        let _ = Field::new(30, 4);
    }
}
