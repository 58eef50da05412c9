//! Timer register layout and bit definitions.
//!
//! Type A and Type B blocks share one layout: every bit sits in the same
//! position in both, and bits a type lacks read as zero. Each register is
//! followed by its CLR / SET / INV aliases.

use bitflags::bitflags;
use tempo_mmio::{Field, register_block};

register_block! {
    /// Timer control, counter and period registers.
    pub TimerRegs {
        /// Control register (TxCON).
        [0x00; u32; rw; sci] tcon => TCon,
        /// Counter (TMRx).
        [0x10; u32; rw; sci] tmr,
        /// Period-compare register (PRx).
        [0x20; u32; rw; sci] pr,
    }
}

bitflags! {
    /// Timer control register (TxCON) flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TCon: u32 {
        /// Timer on.
        const ON = 1 << 15;
        /// Stop in idle mode.
        const SIDL = 1 << 13;
        /// Asynchronous write disable (Type A).
        const TWDIS = 1 << 12;
        /// Asynchronous write in progress (Type A).
        const TWIP = 1 << 11;
        /// Gated time accumulation.
        const TGATE = 1 << 7;
        /// 32-bit combine (Type B master).
        const T32 = 1 << 3;
        /// External clock synchronisation (Type A).
        const TSYNC = 1 << 2;
        /// External clock source.
        const TCS = 1 << 1;
        /// Prescaler selector bits, accessed via the `TCKPS` fields.
        const _ = !0;
    }
}

/// Type A prescaler selector (TCKPS<1:0>).
pub const TYPE_A_TCKPS: Field = Field::new(4, 2);

/// Type B prescaler selector (TCKPS<2:0>).
pub const TYPE_B_TCKPS: Field = Field::new(4, 3);

/// Combined priority group in IPCx: sub-priority in bits 1:0, priority in 4:2.
pub const PRIORITY_GROUP: Field = Field::new(0, 5);

/// Highest interrupt priority level.
pub const MAX_PRIORITY: u8 = 7;

/// Highest interrupt sub-priority level.
pub const MAX_SUBPRIORITY: u8 = 3;

/// Packs a priority and sub-priority into the 5-bit IPCx group layout.
#[must_use]
pub const fn priority_group(priority: u8, subpriority: u8) -> u32 {
    ((priority as u32 & 0x7) << 2) | (subpriority as u32 & 0x3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_mmio::sim::SimulatedIo;

    #[test]
    fn block_offsets() {
        let io = SimulatedIo::new();
        let regs = TimerRegs::new(&io, 0xBF80_0800);
        assert_eq!(regs.tcon_addr(), 0xBF80_0800);
        assert_eq!(regs.tmr_addr(), 0xBF80_0810);
        assert_eq!(regs.pr_addr(), 0xBF80_0820);
    }

    #[test]
    fn prescaler_field_survives_flag_roundtrip() {
        let word = TCon::ON.bits() | TYPE_B_TCKPS.place(0b110);
        let tcon = TCon::from_bits_retain(word);
        assert!(tcon.contains(TCon::ON));
        assert_eq!(TYPE_B_TCKPS.extract(tcon.bits()), 0b110);
    }

    #[test]
    fn priority_group_layout() {
        assert_eq!(priority_group(7, 3), 0b11111);
        assert_eq!(priority_group(4, 1), 0b10001);
        assert_eq!(priority_group(1, 0), 0b00100);
    }
}
