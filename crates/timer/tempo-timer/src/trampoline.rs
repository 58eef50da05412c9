//! Interrupt entry glue.
//!
//! The platform's vector table points each timer line at one of the
//! [`TRAMPOLINES`]. Every trampoline funnels into [`dispatch`], which clears
//! the line's pending flag and hands the interrupt to the installed
//! [`InterruptSink`] (normally the [`TimerManager`]).
//!
//! A line whose interrupt belongs to a scheduler tick can be reserved with
//! [`reserve_line`]; `dispatch` then leaves it untouched.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tempo_core::cell::RacyCell;
use tempo_core::id::TimerNumber;
use tempo_mmio::RegisterIo;

use crate::manager::TimerManager;
use crate::registry::MAX_TIMERS;

/// Receiver of timer interrupts.
pub trait InterruptSink: Sync {
    /// Clears the pending flag of timer `number`.
    fn acknowledge(&self, number: TimerNumber);

    /// Services an interrupt on the line of timer `number`.
    fn service(&self, number: TimerNumber);
}

impl<B: RegisterIo> InterruptSink for TimerManager<B> {
    fn acknowledge(&self, number: TimerNumber) {
        self.clear_pending_flag_by_number(number);
    }

    fn service(&self, number: TimerNumber) {
        self.handle_interrupt(number);
    }
}

static SINK: RacyCell<Option<&'static dyn InterruptSink>> = RacyCell::new(None);
static INSTALLED: AtomicBool = AtomicBool::new(false);
static RESERVED: AtomicU32 = AtomicU32::new(0);

/// Installs the sink every trampoline dispatches to.
///
/// # Safety
///
/// Timer interrupts must be masked for the duration of the call; no
/// [`dispatch`] may run concurrently with it.
pub unsafe fn install(sink: &'static dyn InterruptSink) {
    // SAFETY: The caller guarantees no dispatch is reading SINK.
    unsafe { *SINK.get() = Some(sink) };
    INSTALLED.store(true, Ordering::Release);
}

fn line_bit(number: TimerNumber) -> Option<u32> {
    number.index().filter(|&i| i < MAX_TIMERS).map(|i| 1 << i)
}

/// Reserves the line of timer `number` for a scheduler tick.
pub fn reserve_line(number: TimerNumber) {
    if let Some(bit) = line_bit(number) {
        RESERVED.fetch_or(bit, Ordering::AcqRel);
    }
}

/// Returns a reserved line to normal dispatch.
pub fn release_line(number: TimerNumber) {
    if let Some(bit) = line_bit(number) {
        RESERVED.fetch_and(!bit, Ordering::AcqRel);
    }
}

/// Returns `true` if the line of timer `number` is reserved.
pub fn is_reserved(number: TimerNumber) -> bool {
    line_bit(number).is_some_and(|bit| RESERVED.load(Ordering::Acquire) & bit != 0)
}

/// Common entry point of every trampoline.
///
/// Does nothing for reserved lines, unknown lines, or before [`install`].
pub fn dispatch(number: TimerNumber) {
    if line_bit(number).is_none() || is_reserved(number) {
        return;
    }
    if !INSTALLED.load(Ordering::Acquire) {
        return;
    }
    // SAFETY: SINK is written only by `install`, which completes (Release
    // store above) before any dispatch observes INSTALLED.
    let Some(sink) = (unsafe { *SINK.get() }) else {
        return;
    };
    sink.acknowledge(number);
    sink.service(number);
}

/// Signature of a trampoline.
pub type StubFn = extern "C" fn();

/// Generate the trampoline for a 0-based line index.
macro_rules! make_stub {
    ($index:expr) => {{
        extern "C" fn stub() {
            dispatch(TimerNumber::new($index + 1));
        }
        stub as StubFn
    }};
}

/// Trampolines, one per line: `TRAMPOLINES[i]` serves timer `i + 1`.
pub static TRAMPOLINES: [StubFn; MAX_TIMERS] = [
    // Lines 1-16
    make_stub!(0),
    make_stub!(1),
    make_stub!(2),
    make_stub!(3),
    make_stub!(4),
    make_stub!(5),
    make_stub!(6),
    make_stub!(7),
    make_stub!(8),
    make_stub!(9),
    make_stub!(10),
    make_stub!(11),
    make_stub!(12),
    make_stub!(13),
    make_stub!(14),
    make_stub!(15),
    // Lines 17-32
    make_stub!(16),
    make_stub!(17),
    make_stub!(18),
    make_stub!(19),
    make_stub!(20),
    make_stub!(21),
    make_stub!(22),
    make_stub!(23),
    make_stub!(24),
    make_stub!(25),
    make_stub!(26),
    make_stub!(27),
    make_stub!(28),
    make_stub!(29),
    make_stub!(30),
    make_stub!(31),
];
