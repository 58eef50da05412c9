//! The timer manager: allocation and interrupt entry.

use tempo_core::id::TimerNumber;
use tempo_mmio::{AliasedReg, RegisterIo};

use crate::config::{self, TimerConfig};
use crate::descriptor::{TimerDescriptor, TimerKind};
use crate::dispatch::{DispatchTable, TimerMode};
use crate::error::{ConfigError, TimerError};
use crate::regs::{TCon, TimerRegs};
use crate::registry::{self, AllocationRegistry, HandleBudget};
use crate::timer::{CounterWidth, ISR_FLAGS_NONE, Timer, TimerIsr, TimerRef};

/// Owns the timer peripherals of one chip.
///
/// Holds the register bus, the chip's descriptor table and the ownership and
/// dispatch state. Independent managers share nothing, so tests build one per
/// case over a simulated bus.
pub struct TimerManager<B: RegisterIo> {
    io: B,
    descriptors: &'static [TimerDescriptor],
    config: TimerConfig,
    registry: AllocationRegistry,
    budget: HandleBudget,
    dispatch: DispatchTable,
}

impl<B: RegisterIo> TimerManager<B> {
    /// Creates a manager over `descriptors`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the table or configuration is unusable.
    pub fn new(
        io: B,
        descriptors: &'static [TimerDescriptor],
        config: TimerConfig,
    ) -> Result<Self, ConfigError> {
        config::validate(descriptors, &config)?;
        tempo_core::tinfo!(
            "tempo: {} timers, {} Hz peripheral clock, {} handles",
            descriptors.len(),
            config.peripheral_clock_hz,
            config.max_handles
        );
        Ok(Self {
            io,
            descriptors,
            config,
            registry: AllocationRegistry::new(),
            budget: HandleBudget::new(config.max_handles),
            dispatch: DispatchTable::new(),
        })
    }

    /// Returns the register bus.
    pub fn io(&self) -> &B {
        &self.io
    }

    /// Returns the descriptor table.
    pub fn descriptors(&self) -> &'static [TimerDescriptor] {
        self.descriptors
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns the peripheral clock frequency in Hz.
    pub fn clock_hz(&self) -> u32 {
        self.config.peripheral_clock_hz
    }

    /// Returns the number of timers.
    pub fn timer_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns the ownership registry.
    pub fn registry(&self) -> &AllocationRegistry {
        &self.registry
    }

    /// Returns the handle budget.
    pub fn budget(&self) -> &HandleBudget {
        &self.budget
    }

    /// Returns the dispatch table.
    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub(crate) fn timer_regs(&self, index: usize) -> TimerRegs<'_, B> {
        TimerRegs::new(&self.io, self.descriptors[index].regs)
    }

    fn index_of(&self, number: TimerNumber) -> Result<usize, TimerError> {
        number
            .index()
            .filter(|&i| i < self.descriptors.len())
            .ok_or(TimerError::NoSuchTimer)
    }

    /// Returns `true` if `number` names a timer that is currently free.
    pub fn is_available(&self, number: TimerNumber) -> bool {
        self.index_of(number)
            .is_ok_and(|index| !self.registry.is_owned(index))
    }

    /// Allocates timer `number`, or the pair it anchors for [`CounterWidth::Bits32`].
    ///
    /// # Errors
    ///
    /// - [`TimerError::NoSuchTimer`] for `0` or a number past the table.
    /// - [`TimerError::InvalidPairing`] for a 32-bit request on anything but
    ///   a Type B master.
    /// - [`TimerError::AlreadyOwned`] if the timer or its partner is taken.
    /// - [`TimerError::OutOfMemory`] if the handle budget is spent.
    pub fn allocate(&self, number: TimerNumber, width: CounterWidth) -> Result<Timer<'_, B>, TimerError> {
        let index = self.index_of(number)?;
        let kind = self.descriptors[index].kind;
        let paired = match width {
            CounterWidth::Bits16 => false,
            CounterWidth::Bits32 if kind == TimerKind::BMaster => true,
            CounterWidth::Bits32 => return Err(TimerError::InvalidPairing),
        };

        let mask = registry::claim_mask(index, paired);
        if !self.registry.claim(mask) {
            tempo_core::tdebug!("{number}: already owned");
            return Err(TimerError::AlreadyOwned);
        }
        if !self.budget.try_acquire() {
            self.registry.free(mask);
            tempo_core::twarn!("{number}: handle budget of {} spent", self.budget.capacity());
            return Err(TimerError::OutOfMemory);
        }

        if kind.has_combine_bit() {
            let regs = self.timer_regs(index);
            if paired {
                regs.tcon_set_bits(TCon::T32);
            } else {
                regs.tcon_clear_bits(TCon::T32);
            }
        }

        let line = index + usize::from(paired);
        self.dispatch.occupy(line, index);

        tempo_core::tdebug!("{number} allocated ({width})");
        Ok(Timer::new(TimerRef::new(self, index, paired)))
    }

    fn enable_reg(&self, index: usize) -> (AliasedReg<'_, B>, u32) {
        let route = &self.descriptors[index].interrupt;
        (AliasedReg::new(&self.io, route.enable), route.mask)
    }

    /// Enables or disables the interrupt source of timer `number`, owned or not.
    ///
    /// # Errors
    ///
    /// [`TimerError::NoSuchTimer`] for an unknown number.
    pub fn set_irq_enabled_by_number(&self, number: TimerNumber, on: bool) -> Result<(), TimerError> {
        let (enable, mask) = self.enable_reg(self.index_of(number)?);
        enable.assign_bits(mask, on);
        Ok(())
    }

    /// Clears the pending interrupt flag of timer `number`.
    pub fn clear_pending_flag_by_number(&self, number: TimerNumber) {
        if let Ok(index) = self.index_of(number) {
            let route = &self.descriptors[index].interrupt;
            AliasedReg::new(&self.io, route.flag).clear_bits(route.mask);
        }
    }

    /// Services an interrupt on the line of timer `number`.
    ///
    /// Called from interrupt context once the pending flag is cleared. A line
    /// without an owner is masked and reported. A single-shot owner's source
    /// is masked before its callback runs.
    pub fn handle_interrupt(&self, number: TimerNumber) {
        let Ok(line) = self.index_of(number) else {
            return;
        };

        let Some(owner) = self.dispatch.owner(line) else {
            let (enable, mask) = self.enable_reg(line);
            enable.clear_bits(mask);
            tempo_core::twarn!("{number}: interrupt with no owner, source masked");
            return;
        };

        let view = TimerRef::new(self, owner, owner != line);
        if self.dispatch.mode(line) == TimerMode::SingleShot {
            view.set_irq_enabled(false);
        }

        let isr = self.dispatch.callback(line);
        if !isr.is_null() {
            // SAFETY: only `TimerIsr<B>` pointers are assigned to this
            // manager's table (see `TimerRef::set_isr`).
            let isr = unsafe { core::mem::transmute::<*mut (), TimerIsr<B>>(isr) };
            isr(&view, ISR_FLAGS_NONE);
        }
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

    use tempo_mmio::sim::SimulatedIo;

    use super::*;
    use crate::fixture::{self, IEC, manager, manager_with};

    fn n(number: u8) -> TimerNumber {
        TimerNumber::new(number)
    }

    #[test]
    fn double_allocation_fails_until_release() {
        let timers = manager();
        let t1 = timers.allocate(n(1), CounterWidth::Bits16).unwrap();
        assert!(!timers.is_available(n(1)));
        assert_eq!(
            timers.allocate(n(1), CounterWidth::Bits16).unwrap_err(),
            TimerError::AlreadyOwned
        );
        t1.release();
        assert!(timers.is_available(n(1)));
        assert!(timers.allocate(n(1), CounterWidth::Bits16).is_ok());
    }

    #[test]
    fn unknown_numbers_are_rejected() {
        let timers = manager();
        for number in [0, 6, 200] {
            assert_eq!(
                timers.allocate(n(number), CounterWidth::Bits16).unwrap_err(),
                TimerError::NoSuchTimer
            );
            assert!(!timers.is_available(n(number)));
        }
    }

    #[test]
    fn only_masters_anchor_pairs() {
        let timers = manager();
        for number in [1, 3, 5] {
            assert_eq!(
                timers.allocate(n(number), CounterWidth::Bits32).unwrap_err(),
                TimerError::InvalidPairing
            );
        }

        let pair = timers.allocate(n(2), CounterWidth::Bits32).unwrap();
        assert!(pair.is_combined());
        assert!(!timers.is_available(n(2)));
        assert!(!timers.is_available(n(3)));
        assert_eq!(
            timers.allocate(n(3), CounterWidth::Bits16).unwrap_err(),
            TimerError::AlreadyOwned
        );

        drop(pair);
        assert!(timers.is_available(n(2)));
        assert!(timers.is_available(n(3)));
    }

    #[test]
    fn owned_slave_blocks_the_pair() {
        let timers = manager();
        let _t5 = timers.allocate(n(5), CounterWidth::Bits16).unwrap();
        assert_eq!(
            timers.allocate(n(4), CounterWidth::Bits32).unwrap_err(),
            TimerError::AlreadyOwned
        );
        assert!(timers.is_available(n(4)));
        assert!(timers.allocate(n(4), CounterWidth::Bits16).is_ok());
    }

    #[test]
    fn combine_bit_follows_requested_width() {
        let timers = manager();
        let io = timers.io();

        let pair = timers.allocate(n(2), CounterWidth::Bits32).unwrap();
        assert_eq!(
            io.writes_to(fixture::tcon(1)).last().map(|w| (w.addr, w.value)),
            Some((fixture::tcon(1) + 0x8, TCon::T32.bits()))
        );
        assert!(TCon::from_bits_retain(io.peek(fixture::tcon(1))).contains(TCon::T32));
        pair.release();

        let single = timers.allocate(n(2), CounterWidth::Bits16).unwrap();
        assert_eq!(
            io.writes_to(fixture::tcon(1)).last().map(|w| (w.addr, w.value)),
            Some((fixture::tcon(1) + 0x4, TCon::T32.bits()))
        );
        drop(single);

        io.clear_journal();
        let _t1 = timers.allocate(n(1), CounterWidth::Bits16).unwrap();
        assert!(io.writes_to(fixture::tcon(0)).is_empty());
    }

    #[test]
    fn handle_budget_is_enforced_and_rolled_back() {
        let timers = manager_with(TimerConfig::new(fixture::CLOCK_HZ).with_max_handles(2));
        let t1 = timers.allocate(n(1), CounterWidth::Bits16).unwrap();
        let _t2 = timers.allocate(n(2), CounterWidth::Bits16).unwrap();
        assert_eq!(
            timers.allocate(n(3), CounterWidth::Bits16).unwrap_err(),
            TimerError::OutOfMemory
        );
        assert!(timers.is_available(n(3)));

        drop(t1);
        assert_eq!(timers.budget().live(), 1);
        assert!(timers.allocate(n(3), CounterWidth::Bits16).is_ok());
    }

    #[test]
    fn release_zeroes_both_halves() {
        let timers = manager();
        let io = timers.io();
        let pair = timers.allocate(n(4), CounterWidth::Bits32).unwrap();
        for index in [3, 4] {
            io.poke(fixture::tcon(index), 0x8078);
            io.poke(fixture::tmr(index), 1234);
            io.poke(fixture::pr(index), 5678);
        }
        pair.release();
        for index in [3, 4] {
            assert_eq!(io.peek(fixture::tcon(index)), 0);
            assert_eq!(io.peek(fixture::tmr(index)), 0);
            assert_eq!(io.peek(fixture::pr(index)), 0);
        }
        assert_eq!(timers.budget().live(), 0);
        assert_eq!(timers.registry().owned_mask(), 0);
    }

    #[test]
    fn release_masks_source_and_vacates_line() {
        let timers = manager();
        let t1 = timers.allocate(n(1), CounterWidth::Bits16).unwrap();
        t1.set_irq_enabled(true);
        t1.set_mode(TimerMode::FreeRunning);
        assert_eq!(timers.dispatch().owner(0), Some(0));

        t1.release();
        assert_eq!(timers.io().peek(IEC) & 1, 0);
        assert_eq!(timers.dispatch().owner(0), None);
        assert_eq!(timers.dispatch().mode(0), TimerMode::Off);
    }

    #[test]
    fn orphan_interrupt_is_masked() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn isr(_timer: &TimerRef<'_, SimulatedIo>, _flags: u32) {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let timers = manager();
        timers.set_irq_enabled_by_number(n(1), true).unwrap();
        timers.handle_interrupt(n(1));
        assert_eq!(timers.io().peek(IEC) & 1, 0);

        // After release the line is orphaned again.
        let t3 = timers.allocate(n(3), CounterWidth::Bits16).unwrap();
        t3.set_isr(Some(isr)).unwrap();
        t3.set_irq_enabled(true);
        t3.release();
        timers.set_irq_enabled_by_number(n(3), true).unwrap();
        timers.handle_interrupt(n(3));
        assert_eq!(timers.io().peek(IEC) & (1 << 2), 0);
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn pair_master_line_is_orphaned() {
        let timers = manager();
        let _pair = timers.allocate(n(2), CounterWidth::Bits32).unwrap();
        timers.set_irq_enabled_by_number(n(2), true).unwrap();
        timers.handle_interrupt(n(2));
        assert_eq!(timers.io().peek(IEC) & (1 << 1), 0);
    }

    #[test]
    fn single_shot_masks_before_callback() {
        static ENABLED_DURING_CALL: AtomicBool = AtomicBool::new(true);
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn isr(timer: &TimerRef<'_, SimulatedIo>, _flags: u32) {
            ENABLED_DURING_CALL.store(timer.is_irq_enabled(), Ordering::SeqCst);
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let timers = manager();
        let t1 = timers.allocate(n(1), CounterWidth::Bits16).unwrap();
        t1.set_isr(Some(isr)).unwrap();
        t1.set_mode(TimerMode::SingleShot);
        t1.set_irq_enabled(true);

        timers.handle_interrupt(n(1));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(!ENABLED_DURING_CALL.load(Ordering::SeqCst));
        assert!(!t1.is_irq_enabled());
    }

    #[test]
    fn free_running_stays_enabled() {
        static FLAGS: AtomicU32 = AtomicU32::new(u32::MAX);
        static NUMBER: AtomicU32 = AtomicU32::new(0);
        fn isr(timer: &TimerRef<'_, SimulatedIo>, flags: u32) {
            FLAGS.store(flags, Ordering::SeqCst);
            NUMBER.store(u32::from(timer.number().as_u8()), Ordering::SeqCst);
        }

        let timers = manager();
        let t4 = timers.allocate(n(4), CounterWidth::Bits16).unwrap();
        t4.set_isr(Some(isr)).unwrap();
        t4.set_mode(TimerMode::FreeRunning);
        t4.set_irq_enabled(true);

        timers.handle_interrupt(n(4));
        assert!(t4.is_irq_enabled());
        assert_eq!(FLAGS.load(Ordering::SeqCst), 0);
        assert_eq!(NUMBER.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn pair_interrupt_arrives_on_slave_line() {
        static COMBINED: AtomicBool = AtomicBool::new(false);
        static NUMBER: AtomicU32 = AtomicU32::new(0);
        fn isr(timer: &TimerRef<'_, SimulatedIo>, _flags: u32) {
            COMBINED.store(timer.is_combined(), Ordering::SeqCst);
            NUMBER.store(u32::from(timer.number().as_u8()), Ordering::SeqCst);
        }

        let timers = manager();
        let pair = timers.allocate(n(2), CounterWidth::Bits32).unwrap();
        pair.set_isr(Some(isr)).unwrap();
        pair.set_irq_enabled(true);
        assert_eq!(timers.io().peek(IEC), 1 << 2);
        assert_eq!(timers.dispatch().owner(2), Some(1));

        timers.handle_interrupt(n(3));
        assert!(COMBINED.load(Ordering::SeqCst));
        assert_eq!(NUMBER.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn number_based_irq_control() {
        let timers = manager();
        assert_eq!(
            timers.set_irq_enabled_by_number(n(9), true),
            Err(TimerError::NoSuchTimer)
        );
        timers.set_irq_enabled_by_number(n(5), true).unwrap();
        assert_eq!(timers.io().peek(IEC), 1 << 4);

        timers.io().poke(fixture::IFS, 0b1_0001);
        timers.clear_pending_flag_by_number(n(5));
        assert_eq!(timers.io().peek(fixture::IFS), 0b0_0001);
    }
}
