//! Per-line interrupt dispatch table.
//!
//! One entry per interrupt line (table index). Each entry records which
//! handle owns the line, the handle's interrupt mode, and the callback to
//! invoke. All three are atomics so the interrupt path reads them without
//! locking while a task allocates, reconfigures or releases timers.
//!
//! In 32-bit mode a pair's interrupt arrives on the slave's line, so the
//! entry for the slave index names the master as owner and the master's own
//! entry stays vacant.

use core::ptr;

use crate::error::TimerError;
use crate::registry::MAX_TIMERS;
use crate::sync::{AtomicPtr, AtomicU8, Ordering};

/// Sentinel owner value for a vacant line.
const NO_OWNER: u8 = u8::MAX;

/// What the interrupt path does with a timer's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerMode {
    /// Counter stopped.
    Off = 0,
    /// Interrupt source disabled after the first event.
    SingleShot = 1,
    /// Every period raises an event.
    FreeRunning = 2,
}

impl TimerMode {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::SingleShot,
            2 => Self::FreeRunning,
            _ => Self::Off,
        }
    }
}

struct DispatchEntry {
    owner: AtomicU8,
    mode: AtomicU8,
    isr: AtomicPtr<()>,
}

impl DispatchEntry {
    fn new() -> Self {
        Self {
            owner: AtomicU8::new(NO_OWNER),
            mode: AtomicU8::new(TimerMode::Off as u8),
            isr: AtomicPtr::new(ptr::null_mut()),
        }
    }
}

/// Owner, mode and callback for every interrupt line.
pub struct DispatchTable {
    entries: [DispatchEntry; MAX_TIMERS],
}

impl DispatchTable {
    /// Creates a table with every line vacant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: core::array::from_fn(|_| DispatchEntry::new()),
        }
    }

    /// Records `owner` as the handle behind `line`, in [`TimerMode::Off`].
    pub(crate) fn occupy(&self, line: usize, owner: usize) {
        let entry = &self.entries[line];
        entry.isr.store(ptr::null_mut(), Ordering::Release);
        entry.mode.store(TimerMode::Off as u8, Ordering::Release);
        // Bounded by MAX_TIMERS.
        entry.owner.store(owner as u8, Ordering::Release);
    }

    /// Marks `line` vacant and drops its callback.
    pub(crate) fn vacate(&self, line: usize) {
        let entry = &self.entries[line];
        entry.owner.store(NO_OWNER, Ordering::Release);
        entry.isr.store(ptr::null_mut(), Ordering::Release);
        entry.mode.store(TimerMode::Off as u8, Ordering::Release);
    }

    /// Returns the table index of the handle that owns `line`.
    #[must_use]
    pub fn owner(&self, line: usize) -> Option<usize> {
        match self.entries.get(line)?.owner.load(Ordering::Acquire) {
            NO_OWNER => None,
            owner => Some(usize::from(owner)),
        }
    }

    /// Returns the interrupt mode recorded for `line`.
    #[must_use]
    pub fn mode(&self, line: usize) -> TimerMode {
        self.entries
            .get(line)
            .map_or(TimerMode::Off, |e| TimerMode::from_u8(e.mode.load(Ordering::Acquire)))
    }

    pub(crate) fn set_mode(&self, line: usize, mode: TimerMode) {
        self.entries[line].mode.store(mode as u8, Ordering::Release);
    }

    /// Installs `isr` on `line` if the line has no callback yet.
    pub(crate) fn assign(&self, line: usize, isr: *mut ()) -> Result<(), TimerError> {
        self.entries[line]
            .isr
            .compare_exchange(ptr::null_mut(), isr, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| TimerError::AlreadyAssigned)
    }

    pub(crate) fn unassign(&self, line: usize) {
        self.entries[line].isr.store(ptr::null_mut(), Ordering::Release);
    }

    /// Returns the callback on `line`, or null.
    pub(crate) fn callback(&self, line: usize) -> *mut () {
        self.entries
            .get(line)
            .map_or(ptr::null_mut(), |e| e.isr.load(Ordering::Acquire))
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}
