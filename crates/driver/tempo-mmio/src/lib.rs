//! Typed special-function-register access.
//!
//! Every register access in Tempo goes through a [`RegisterIo`] bus. On the
//! target that bus is [`VolatileIo`], which performs volatile 32-bit loads
//! and stores; on the host it is the `sim` feature's `SimulatedIo`.
//!
//! PIC32-class parts pair every writable register with three write-only
//! aliases: CLR at `+0x4`, SET at `+0x8` and INV at `+0xC`. Writing a mask to
//! an alias clears, sets or inverts exactly those bits in one bus cycle,
//! which is how the driver updates shared enable and priority registers
//! without a read-modify-write race against interrupt handlers.
//!
//! # Example
//!
//! ```ignore
//! use tempo_mmio::register_block;
//!
//! register_block! {
//!     /// Timer control block.
//!     pub TimerRegs {
//!         /// Control register.
//!         [0x00; u32; rw; sci] tcon => TCon,
//!         /// Period register.
//!         [0x20; u32; rw; sci] pr,
//!     }
//! }
//! ```

#![cfg_attr(not(any(test, feature = "sim")), no_std)]
#![warn(missing_docs)]

extern crate self as tempo_mmio;

mod aliased;
mod field;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use aliased::AliasedReg;
pub use field::Field;
pub use tempo_mmio_macros::register_block;

/// Byte offset of the CLR alias from its base register.
pub const CLR_OFFSET: usize = 0x4;
/// Byte offset of the SET alias from its base register.
pub const SET_OFFSET: usize = 0x8;
/// Byte offset of the INV alias from its base register.
pub const INV_OFFSET: usize = 0xC;

/// A bus that performs 32-bit register reads and writes by address.
pub trait RegisterIo: Sync {
    /// Reads the 32-bit register at `addr`.
    fn read_u32(&self, addr: usize) -> u32;

    /// Writes `value` to the 32-bit register at `addr`.
    fn write_u32(&self, addr: usize, value: u32);
}

/// The target bus: volatile loads and stores at physical addresses.
#[derive(Debug)]
pub struct VolatileIo {
    _private: (),
}

impl VolatileIo {
    /// Creates the volatile bus.
    ///
    /// # Safety
    ///
    /// Every address later passed to this bus (register block bases plus
    /// their offsets, descriptor interrupt registers and their aliases) must
    /// be a mapped, 4-byte-aligned special-function register.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterIo for VolatileIo {
    #[inline]
    fn read_u32(&self, addr: usize) -> u32 {
        // SAFETY: The creator of `VolatileIo` guarantees that every address
        // handed to the bus is a valid, aligned register.
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write_u32(&self, addr: usize, value: u32) {
        // SAFETY: Same contract as `read_u32`.
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedIo;
    use core::sync::atomic::{AtomicU32, Ordering};

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Ctl: u32 {
            const ON = 1 << 15;
            const MODE = 1 << 3;
            const _ = !0;
        }
    }

    register_block! {
        /// Test block.
        TestRegs {
            /// Control.
            [0x00; u32; rw; sci] ctl => Ctl,
            /// Counter.
            [0x10; u32; rw] count,
            /// Status.
            [0x20; u32; ro] status,
        }
    }

    #[test]
    fn generated_block_reads_and_writes() {
        let io = SimulatedIo::new();
        let regs = TestRegs::new(&io, 0x1000);
        regs.set_count(42);
        assert_eq!(regs.count(), 42);
        assert_eq!(io.peek(0x1010), 42);
        io.poke(0x1020, 7);
        assert_eq!(regs.status(), 7);
        assert_eq!(regs.count_addr(), 0x1010);
    }

    #[test]
    fn generated_aliases_target_alias_addresses() {
        let io = SimulatedIo::new();
        let regs = TestRegs::new(&io, 0x2000);
        regs.set_ctl(Ctl::MODE);
        regs.ctl_set_bits(Ctl::ON);
        assert_eq!(regs.ctl(), Ctl::ON | Ctl::MODE);
        regs.ctl_clear_bits(Ctl::MODE);
        assert_eq!(regs.ctl(), Ctl::ON);
        regs.ctl_invert_bits(Ctl::ON | Ctl::MODE);
        assert_eq!(regs.ctl(), Ctl::MODE);

        let addrs: Vec<usize> = io.writes().iter().map(|w| w.addr).collect();
        assert_eq!(addrs, [0x2000, 0x2008, 0x2004, 0x200C]);
    }

    #[test]
    fn volatile_io_touches_memory() {
        let cell = AtomicU32::new(5);
        // SAFETY: the only address used is the live, aligned atomic above.
        let io = unsafe { VolatileIo::new() };
        let addr = cell.as_ptr() as usize;
        assert_eq!(io.read_u32(addr), 5);
        io.write_u32(addr, 9);
        assert_eq!(cell.load(Ordering::SeqCst), 9);
    }
}
