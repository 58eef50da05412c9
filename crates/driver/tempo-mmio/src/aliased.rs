//! A single register with SET / CLR / INV aliases.
//!
//! Interrupt enable, flag and priority registers are shared between many
//! peripherals and live outside any one register block, so the driver
//! addresses them one at a time through this handle.

use crate::{CLR_OFFSET, Field, INV_OFFSET, RegisterIo, SET_OFFSET};

/// A 32-bit register at a fixed address with alias registers.
pub struct AliasedReg<'io, B: ?Sized> {
    io: &'io B,
    addr: usize,
}

impl<B: ?Sized> Clone for AliasedReg<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: ?Sized> Copy for AliasedReg<'_, B> {}

impl<'io, B: RegisterIo + ?Sized> AliasedReg<'io, B> {
    /// Creates a handle for the register at `addr`.
    #[must_use]
    pub const fn new(io: &'io B, addr: usize) -> Self {
        Self { io, addr }
    }

    /// Returns the base register address.
    #[must_use]
    pub const fn addr(&self) -> usize {
        self.addr
    }

    /// Reads the register.
    #[inline]
    pub fn read(&self) -> u32 {
        self.io.read_u32(self.addr)
    }

    /// Writes the register.
    #[inline]
    pub fn write(&self, value: u32) {
        self.io.write_u32(self.addr, value);
    }

    /// Sets `mask` bits through the SET alias.
    #[inline]
    pub fn set_bits(&self, mask: u32) {
        self.io.write_u32(self.addr + SET_OFFSET, mask);
    }

    /// Clears `mask` bits through the CLR alias.
    #[inline]
    pub fn clear_bits(&self, mask: u32) {
        self.io.write_u32(self.addr + CLR_OFFSET, mask);
    }

    /// Inverts `mask` bits through the INV alias.
    #[inline]
    pub fn invert_bits(&self, mask: u32) {
        self.io.write_u32(self.addr + INV_OFFSET, mask);
    }

    /// Returns `true` if any bit of `mask` is set.
    #[inline]
    pub fn any_set(&self, mask: u32) -> bool {
        self.read() & mask != 0
    }

    /// Sets or clears `mask` through the matching alias.
    #[inline]
    pub fn assign_bits(&self, mask: u32, on: bool) {
        if on {
            self.set_bits(mask);
        } else {
            self.clear_bits(mask);
        }
    }

    /// Reads a field.
    #[inline]
    pub fn read_field(&self, field: Field) -> u32 {
        field.extract(self.read())
    }

    /// Replaces a field using a CLR write followed by a SET write.
    ///
    /// Each write is atomic, but between the two the field reads as zero.
    /// Callers that must not expose the intermediate value to an interrupt
    /// mask that interrupt around the call.
    #[inline]
    pub fn replace_field(&self, field: Field, value: u32) {
        self.clear_bits(field.mask());
        let placed = field.place(value);
        if placed != 0 {
            self.set_bits(placed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedIo;

    #[test]
    fn set_clear_invert() {
        let io = SimulatedIo::new();
        let reg = AliasedReg::new(&io, 0x40);
        reg.write(0b1000);
        reg.set_bits(0b0001);
        assert_eq!(reg.read(), 0b1001);
        reg.clear_bits(0b1000);
        assert_eq!(reg.read(), 0b0001);
        reg.invert_bits(0b0011);
        assert_eq!(reg.read(), 0b0010);
    }

    #[test]
    fn assign_bits_picks_alias() {
        let io = SimulatedIo::new();
        let reg = AliasedReg::new(&io, 0x80);
        reg.assign_bits(1 << 9, true);
        assert!(reg.any_set(1 << 9));
        reg.assign_bits(1 << 9, false);
        assert!(!reg.any_set(1 << 9));
        let addrs: Vec<usize> = io.writes().iter().map(|w| w.addr).collect();
        assert_eq!(addrs, [0x88, 0x84]);
    }

    #[test]
    fn replace_field_clears_then_sets() {
        let io = SimulatedIo::new();
        let reg = AliasedReg::new(&io, 0x100);
        let field = Field::new(8, 5);
        reg.write(0xFFFF_FFFF);
        io.clear_journal();

        reg.replace_field(field, 0b00101);
        assert_eq!(reg.read_field(field), 0b00101);
        assert_eq!(reg.read() | field.mask(), 0xFFFF_FFFF);

        let writes = io.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!((writes[0].addr, writes[0].value), (0x104, 0x1F00));
        assert_eq!((writes[1].addr, writes[1].value), (0x108, 0x0500));
    }
}
