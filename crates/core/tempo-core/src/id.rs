//! Type-safe identifiers for timer resources.
//!
//! The public API numbers timers from 1 (matching the `T1CON`, `T2CON`, ...
//! register names), while tables are indexed from 0. These newtypes keep the
//! two from being mixed up, along with the interrupt request and vector
//! numbers a timer is routed to.

use core::fmt;

/// 1-based timer number as printed in the datasheet (`Timer1` is `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TimerNumber(u8);

impl TimerNumber {
    /// Creates a new `TimerNumber`. `0` is representable but never valid.
    pub const fn new(val: u8) -> Self {
        Self(val)
    }

    /// Returns the timer number for a 0-based table index.
    ///
    /// Returns `None` if the index does not fit a timer number.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index >= u8::MAX as usize {
            None
        } else {
            Some(Self(index as u8 + 1))
        }
    }

    /// Returns the raw `u8` value.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns the 0-based table index, or `None` for timer number `0`.
    pub const fn index(self) -> Option<usize> {
        match self.0 {
            0 => None,
            n => Some(n as usize - 1),
        }
    }
}

impl fmt::Display for TimerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer{}", self.0)
    }
}

/// Interrupt request number (the bit index in the IFS/IEC register set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct IrqNumber(u8);

impl IrqNumber {
    /// Creates a new `IrqNumber`.
    pub const fn new(val: u8) -> Self {
        Self(val)
    }

    /// Returns the raw `u8` value.
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for IrqNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interrupt vector number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct VectorNumber(u8);

impl VectorNumber {
    /// Creates a new `VectorNumber`.
    pub const fn new(val: u8) -> Self {
        Self(val)
    }

    /// Returns the raw `u8` value.
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for VectorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_number_to_index() {
        assert_eq!(TimerNumber::new(1).index(), Some(0));
        assert_eq!(TimerNumber::new(5).index(), Some(4));
    }

    #[test]
    fn timer_number_zero_has_no_index() {
        assert_eq!(TimerNumber::new(0).index(), None);
    }

    #[test]
    fn timer_number_from_index() {
        assert_eq!(TimerNumber::from_index(2), Some(TimerNumber::new(3)));
        assert_eq!(TimerNumber::from_index(255), None);
    }

    #[test]
    fn timer_number_display() {
        assert_eq!(format!("{}", TimerNumber::new(2)), "Timer2");
    }

    #[test]
    fn irq_and_vector_roundtrip() {
        assert_eq!(IrqNumber::new(9).as_u8(), 9);
        assert_eq!(VectorNumber::new(8).as_u8(), 8);
    }
}
