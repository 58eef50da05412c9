//! Error types for the code generator.

use std::fmt;

/// Errors that can occur during code generation.
#[derive(Debug)]
pub enum CodegenError {
    /// The chip name is not a lower-case Rust identifier.
    InvalidName(String),
    /// The chip lists no timers.
    NoTimers(String),
    /// The chip lists more timers than the driver supports.
    TooManyTimers {
        /// Chip name.
        chip: String,
        /// Number of timers listed.
        count: usize,
    },
    /// A timer number does not match its position.
    TimerOrder {
        /// Chip name.
        chip: String,
        /// Number expected at this position.
        expected: usize,
        /// Number found.
        found: u8,
    },
    /// A Type B master without a slave after it, or a slave without a master.
    Pairing {
        /// Chip name.
        chip: String,
        /// Offending timer number.
        timer: u8,
    },
    /// An interrupt bit or priority field lies outside a 32-bit register.
    BitRange {
        /// Chip name.
        chip: String,
        /// Offending timer number.
        timer: u8,
    },
    /// Formatting the output failed.
    Format(fmt::Error),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid chip name: {name:?}"),
            Self::NoTimers(chip) => write!(f, "{chip}: no timers listed"),
            Self::TooManyTimers { chip, count } => {
                write!(f, "{chip}: {count} timers exceed the maximum of {}", crate::MAX_TIMERS)
            }
            Self::TimerOrder {
                chip,
                expected,
                found,
            } => write!(f, "{chip}: expected Timer{expected}, found Timer{found}"),
            Self::Pairing { chip, timer } => {
                write!(f, "{chip}: Timer{timer} breaks master/slave pairing")
            }
            Self::BitRange { chip, timer } => {
                write!(f, "{chip}: Timer{timer} interrupt bits exceed 32-bit registers")
            }
            Self::Format(e) => write!(f, "formatting error: {e}"),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<fmt::Error> for CodegenError {
    fn from(e: fmt::Error) -> Self {
        Self::Format(e)
    }
}
