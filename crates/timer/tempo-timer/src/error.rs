//! Error types for timer management.

use core::fmt;

use tempo_core::id::TimerNumber;

/// Failure of a timer operation.
///
/// Every fallible driver call returns one of these instead of panicking, so
/// the same code paths are safe to take from interrupt context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The timer number is `0` or beyond the descriptor table.
    NoSuchTimer,
    /// The timer (or its 32-bit partner) is owned by another handle.
    AlreadyOwned,
    /// 32-bit mode was requested on a timer that is not a Type B master.
    InvalidPairing,
    /// No handle storage is left.
    OutOfMemory,
    /// The requested period does not fit the counter with any prescaler.
    PeriodUnachievable,
    /// The divisor is not one of the timer's prescaler steps.
    InvalidPrescaler,
    /// Priority above 7 or sub-priority above 3.
    InvalidPriority,
    /// An interrupt callback is already assigned to this timer.
    AlreadyAssigned,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchTimer => write!(f, "no such timer"),
            Self::AlreadyOwned => write!(f, "timer already owned"),
            Self::InvalidPairing => write!(f, "32-bit mode requires a Type B master timer"),
            Self::OutOfMemory => write!(f, "out of timer handle storage"),
            Self::PeriodUnachievable => write!(f, "period outside the prescaler range"),
            Self::InvalidPrescaler => write!(f, "prescaler divisor not supported by this timer"),
            Self::InvalidPriority => write!(f, "interrupt priority out of range"),
            Self::AlreadyAssigned => write!(f, "interrupt callback already assigned"),
        }
    }
}

/// Rejected descriptor table or configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The descriptor table is empty.
    NoTimers,
    /// More timers than the allocation bitmap can track.
    TooManyTimers(usize),
    /// The peripheral clock frequency is zero.
    ZeroClock,
    /// The handle budget is zero.
    ZeroHandles,
    /// A Type B master is not followed by a Type B slave.
    UnpairedMaster(TimerNumber),
    /// A Type B slave does not follow a Type B master.
    OrphanSlave(TimerNumber),
    /// The priority group of a timer does not fit its priority register.
    PriorityShift(TimerNumber),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTimers => write!(f, "descriptor table is empty"),
            Self::TooManyTimers(n) => write!(f, "{n} timers exceed the supported maximum"),
            Self::ZeroClock => write!(f, "peripheral clock frequency is zero"),
            Self::ZeroHandles => write!(f, "handle budget is zero"),
            Self::UnpairedMaster(n) => write!(f, "{n} is a master without a slave partner"),
            Self::OrphanSlave(n) => write!(f, "{n} is a slave without a master partner"),
            Self::PriorityShift(n) => write!(f, "{n} priority field lies outside its register"),
        }
    }
}
