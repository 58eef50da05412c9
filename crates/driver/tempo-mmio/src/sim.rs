//! Host-side register simulator.
//!
//! [`SimulatedIo`] backs a sparse address space with plain memory and applies
//! the PIC32 alias convention to every address: within each 16-byte group,
//! offset `0x0` is the register itself and `0x4` / `0x8` / `0xC` are its
//! CLR / SET / INV aliases. Alias registers read as zero, as on hardware.
//!
//! Every bus write is journaled so tests can assert on the exact sequence
//! of register operations the driver performs.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::RegisterIo;

/// One journaled bus write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWrite {
    /// Address written, including any alias offset.
    pub addr: usize,
    /// Value written.
    pub value: u32,
}

#[derive(Default)]
struct SimState {
    words: BTreeMap<usize, u32>,
    journal: Vec<BusWrite>,
}

/// A simulated register bus with SET/CLR/INV alias semantics.
#[derive(Default)]
pub struct SimulatedIo {
    state: Mutex<SimState>,
}

impl SimulatedIo {
    /// Creates an empty bus; every register reads as zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // A panicking test thread must not poison the bus for the others.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Reads a register without journaling (test inspection).
    #[must_use]
    pub fn peek(&self, addr: usize) -> u32 {
        self.lock().words.get(&addr).copied().unwrap_or(0)
    }

    /// Writes a register without alias decoding or journaling.
    ///
    /// Models the hardware changing a register on its own, e.g. the counter
    /// advancing or a pending flag being raised.
    pub fn poke(&self, addr: usize, value: u32) {
        self.lock().words.insert(addr, value);
    }

    /// Returns the journaled writes since the last [`clear_journal`](Self::clear_journal).
    #[must_use]
    pub fn writes(&self) -> Vec<BusWrite> {
        self.lock().journal.clone()
    }

    /// Returns the journaled writes that landed on `addr` or its aliases.
    #[must_use]
    pub fn writes_to(&self, addr: usize) -> Vec<BusWrite> {
        let base = addr & !0xF;
        self.lock()
            .journal
            .iter()
            .copied()
            .filter(|w| w.addr & !0xF == base)
            .collect()
    }

    /// Empties the write journal.
    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }
}

impl RegisterIo for SimulatedIo {
    fn read_u32(&self, addr: usize) -> u32 {
        if addr & 0xF != 0 {
            return 0;
        }
        self.peek(addr)
    }

    fn write_u32(&self, addr: usize, value: u32) {
        let mut state = self.lock();
        state.journal.push(BusWrite { addr, value });

        let base = addr & !0xF;
        let word = state.words.entry(base).or_insert(0);
        match addr & 0xF {
            0x0 => *word = value,
            0x4 => *word &= !value,
            0x8 => *word |= value,
            0xC => *word ^= value,
            // Unaligned offsets do not exist on the target bus.
            _ => {}
        }
    }
}
