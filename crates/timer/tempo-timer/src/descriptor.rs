//! Per-chip timer descriptors.
//!
//! A descriptor table is static data supplied by the chip crate: one entry
//! per physical timer, in timer-number order. The driver only ever holds
//! shared references to it.

use tempo_core::id::{IrqNumber, VectorNumber};
use tempo_mmio::Field;

use crate::regs::{TYPE_A_TCKPS, TYPE_B_TCKPS};

/// Hardware variant of a timer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Type A: 16-bit, prescaler steps 1/8/64/256, asynchronous clock capable.
    A,
    /// Type B master: 16-bit, may anchor a 32-bit pair with the next timer.
    BMaster,
    /// Type B slave: 16-bit, or upper half of a 32-bit pair.
    BSlave,
}

impl TimerKind {
    /// Returns the prescaler steps as right-shift amounts, ascending.
    #[must_use]
    pub const fn prescaler_shifts(self) -> &'static [u8] {
        match self {
            Self::A => &[0, 3, 6, 8],
            Self::BMaster | Self::BSlave => &[0, 1, 2, 3, 4, 5, 6, 8],
        }
    }

    /// Returns the prescaler selector field of the control register.
    #[must_use]
    pub const fn prescaler_field(self) -> Field {
        match self {
            Self::A => TYPE_A_TCKPS,
            Self::BMaster | Self::BSlave => TYPE_B_TCKPS,
        }
    }

    /// Returns `true` if the control register has a 32-bit combine bit.
    #[must_use]
    pub const fn has_combine_bit(self) -> bool {
        matches!(self, Self::BMaster)
    }
}

/// Where a timer's interrupt is enabled, flagged and prioritised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptRoute {
    /// Address of the interrupt enable register (IECx).
    pub enable: usize,
    /// Address of the interrupt flag register (IFSx).
    pub flag: usize,
    /// Bit of this timer in the enable and flag registers.
    pub mask: u32,
    /// Address of the interrupt priority register (IPCx).
    pub priority: usize,
    /// Bit position of this timer's 5-bit priority group in IPCx.
    pub priority_shift: u8,
    /// Interrupt request number.
    pub irq: IrqNumber,
    /// Interrupt vector number.
    pub vector: VectorNumber,
}

/// Immutable description of one physical timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDescriptor {
    /// Hardware variant.
    pub kind: TimerKind,
    /// Base address of the `TxCON` / `TMRx` / `PRx` register block.
    pub regs: usize,
    /// Interrupt routing.
    pub interrupt: InterruptRoute,
}
