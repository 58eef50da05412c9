//! Timer ownership bitmap and handle budget.
//!
//! Ownership lives in one 32-bit word, bit `i` for table index `i`. A claim
//! covers every bit of its mask in a single compare-exchange, so a 32-bit
//! pair is taken or refused as a unit and two racing claims on overlapping
//! masks cannot both succeed.

use crate::sync::{AtomicU32, AtomicUsize, Ordering};

/// Most timers a descriptor table may describe.
pub const MAX_TIMERS: usize = 32;

/// Returns the ownership mask for `index`, plus its partner when `paired`.
#[must_use]
pub const fn claim_mask(index: usize, paired: bool) -> u32 {
    let bit = 1u32 << index;
    if paired { bit | (bit << 1) } else { bit }
}

/// Lock-free record of which timers are owned.
pub struct AllocationRegistry {
    owned: AtomicU32,
}

impl AllocationRegistry {
    /// Creates a registry with every timer free.
    #[must_use]
    pub fn new() -> Self {
        Self {
            owned: AtomicU32::new(0),
        }
    }

    /// Claims every timer in `mask`, or none of them.
    ///
    /// Returns `false` if any bit of `mask` is already owned.
    pub fn claim(&self, mask: u32) -> bool {
        let mut current = self.owned.load(Ordering::Acquire);
        loop {
            if current & mask != 0 {
                return false;
            }
            match self.owned.compare_exchange_weak(
                current,
                current | mask,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Frees every timer in `mask`.
    pub fn free(&self, mask: u32) {
        self.owned.fetch_and(!mask, Ordering::Release);
    }

    /// Returns `true` if the timer at `index` is owned.
    #[must_use]
    pub fn is_owned(&self, index: usize) -> bool {
        index < MAX_TIMERS && self.owned.load(Ordering::Acquire) & (1 << index) != 0
    }

    /// Returns the raw ownership word.
    #[must_use]
    pub fn owned_mask(&self) -> u32 {
        self.owned.load(Ordering::Acquire)
    }
}

impl Default for AllocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts live handles against a fixed capacity.
pub struct HandleBudget {
    live: AtomicUsize,
    capacity: usize,
}

impl HandleBudget {
    /// Creates a budget of `capacity` handles.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            live: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Takes one handle slot; returns `false` if none is left.
    pub fn try_acquire(&self) -> bool {
        let mut current = self.live.load(Ordering::Acquire);
        loop {
            if current >= self.capacity {
                return false;
            }
            match self.live.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns one handle slot.
    pub fn release(&self) {
        self.live.fetch_sub(1, Ordering::Release);
    }

    /// Returns the number of live handles.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Returns the handle capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
