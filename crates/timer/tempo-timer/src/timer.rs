//! Timer handles.
//!
//! [`Timer`] is the owned result of an allocation. It dereferences to a
//! [`TimerRef`], which carries every configuration and interrupt operation;
//! interrupt callbacks receive a `&TimerRef` for the line that fired.

use core::fmt;
use core::ops::Deref;

use tempo_core::id::{IrqNumber, TimerNumber, VectorNumber};
use tempo_mmio::{AliasedReg, RegisterIo};

use crate::descriptor::{InterruptRoute, TimerDescriptor, TimerKind};
use crate::dispatch::TimerMode;
use crate::error::TimerError;
use crate::manager::TimerManager;
use crate::period::{self, Prescale};
use crate::regs::{self, MAX_PRIORITY, MAX_SUBPRIORITY, PRIORITY_GROUP, TCon, TimerRegs};
use crate::registry;

/// Interrupt callback: the timer view and a flags word (always `0`).
pub type TimerIsr<B> = fn(&TimerRef<'_, B>, u32);

/// Flags value passed to every callback.
pub const ISR_FLAGS_NONE: u32 = 0;

/// Index value of a released handle.
const INVALID_INDEX: usize = usize::MAX;

/// Counter width requested at allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterWidth {
    /// One 16-bit timer.
    Bits16,
    /// A Type B master and its slave combined into one 32-bit counter.
    Bits32,
}

impl fmt::Display for CounterWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits16 => write!(f, "16-bit"),
            Self::Bits32 => write!(f, "32-bit"),
        }
    }
}

/// The operations of an allocated timer.
///
/// Only ever reached by reference: through a [`Timer`] or as the argument
/// of an interrupt callback. It is neither `Clone` nor `Copy`, so no view
/// can outlive the allocation it describes.
pub struct TimerRef<'m, B: RegisterIo> {
    manager: &'m TimerManager<B>,
    index: usize,
    paired: bool,
}

impl<B: RegisterIo> fmt::Debug for TimerRef<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRef")
            .field("number", &self.number())
            .field("paired", &self.paired)
            .finish_non_exhaustive()
    }
}

impl<'m, B: RegisterIo> TimerRef<'m, B> {
    pub(crate) const fn new(manager: &'m TimerManager<B>, index: usize, paired: bool) -> Self {
        Self {
            manager,
            index,
            paired,
        }
    }

    /// Returns the 1-based number of the timer (the master, for a pair).
    #[must_use]
    pub fn number(&self) -> TimerNumber {
        TimerNumber::from_index(self.index).unwrap_or(TimerNumber::new(0))
    }

    /// Returns the hardware variant of the timer.
    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.descriptor().kind
    }

    /// Returns `true` for a 32-bit master/slave pair.
    #[must_use]
    pub const fn is_combined(&self) -> bool {
        self.paired
    }

    /// Returns the counter width.
    #[must_use]
    pub const fn width(&self) -> CounterWidth {
        if self.paired {
            CounterWidth::Bits32
        } else {
            CounterWidth::Bits16
        }
    }

    /// Returns the largest counter value.
    #[must_use]
    pub const fn max_count(&self) -> u32 {
        if self.paired { u32::MAX } else { u16::MAX as u32 }
    }

    fn descriptor(&self) -> &'static TimerDescriptor {
        &self.manager.descriptors()[self.index]
    }

    /// The interrupt line: the slave's in 32-bit mode.
    fn line(&self) -> usize {
        self.index + usize::from(self.paired)
    }

    fn route(&self) -> &'static InterruptRoute {
        &self.manager.descriptors()[self.line()].interrupt
    }

    fn regs(&self) -> TimerRegs<'m, B> {
        self.manager.timer_regs(self.index)
    }

    fn reg(&self, addr: usize) -> AliasedReg<'m, B> {
        AliasedReg::new(self.manager.io(), addr)
    }

    // ---------------------------------------------------------------------
    // Control
    // ---------------------------------------------------------------------

    /// Starts or stops the counter.
    pub fn set_enabled(&self, on: bool) {
        if on {
            self.regs().tcon_set_bits(TCon::ON);
        } else {
            self.regs().tcon_clear_bits(TCon::ON);
        }
    }

    /// Returns `true` if the counter is running.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.regs().tcon().contains(TCon::ON)
    }

    /// Sets the interrupt mode. [`TimerMode::Off`] also stops the counter.
    pub fn set_mode(&self, mode: TimerMode) {
        self.manager.dispatch().set_mode(self.line(), mode);
        if mode == TimerMode::Off {
            self.set_enabled(false);
        }
    }

    /// Returns the interrupt mode.
    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.manager.dispatch().mode(self.line())
    }

    /// Returns the live counter value.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.regs().tmr()
    }

    /// Returns the period register value.
    #[must_use]
    pub fn period_register(&self) -> u32 {
        self.regs().pr()
    }

    /// Writes the period register directly.
    ///
    /// The counter is cleared if it already lies beyond the new value.
    ///
    /// # Errors
    ///
    /// [`TimerError::PeriodUnachievable`] if `value` is wider than the counter.
    pub fn set_period_register(&self, value: u32) -> Result<(), TimerError> {
        if value > self.max_count() {
            return Err(TimerError::PeriodUnachievable);
        }
        self.write_period_register(value);
        Ok(())
    }

    fn write_period_register(&self, value: u32) {
        let regs = self.regs();
        regs.set_pr(value);
        if regs.tmr() > value {
            regs.set_tmr(0);
        }
    }

    /// Runs `f` with the counter stopped, then restores the ON bit.
    fn with_counter_stopped(&self, f: impl FnOnce()) {
        let was_on = self.is_enabled();
        if was_on {
            self.regs().tcon_clear_bits(TCon::ON);
        }
        f();
        if was_on {
            self.regs().tcon_set_bits(TCon::ON);
        }
    }

    fn write_prescale(&self, prescale: Prescale) {
        let field = self.kind().prescaler_field();
        self.reg(self.regs().tcon_addr())
            .replace_field(field, u32::from(prescale.selector));
    }

    fn current_prescale(&self) -> Prescale {
        let kind = self.kind();
        let selector = kind.prescaler_field().extract(self.regs().tcon().bits());
        // Every selector of the field width maps to a step.
        u8::try_from(selector)
            .ok()
            .and_then(|s| Prescale::from_selector(kind, s))
            .unwrap_or(Prescale { selector: 0, shift: 0 })
    }

    // ---------------------------------------------------------------------
    // Period and frequency
    // ---------------------------------------------------------------------

    /// Programs the timer to roll over every `period_us` microseconds.
    ///
    /// Picks the finest prescaler that fits the period into the counter.
    /// A running counter is stopped across the update and restarted after.
    ///
    /// # Errors
    ///
    /// [`TimerError::PeriodUnachievable`] if the period needs a divisor above
    /// 256 or rounds to zero ticks.
    pub fn set_period_us(&self, period_us: u32) -> Result<(), TimerError> {
        let clock = self.manager.clock_hz();
        let plan = period::plan(self.kind(), clock, period_us, self.max_count())?;

        self.with_counter_stopped(|| {
            self.write_prescale(plan.prescale);
            self.write_period_register(plan.period_register);
        });

        tempo_core::ttrace!(
            "{}: period {}us -> 1:{} PR={}",
            self.number(),
            period_us,
            plan.prescale.divisor(),
            plan.period_register
        );
        Ok(())
    }

    /// Returns the programmed period in microseconds.
    #[must_use]
    pub fn period_us(&self) -> u64 {
        let prescale = self.current_prescale();
        period::us_for(self.manager.clock_hz(), prescale.shift, self.period_register())
    }

    /// Programs the timer to roll over at `millihertz` / 1000 Hz.
    ///
    /// # Errors
    ///
    /// [`TimerError::PeriodUnachievable`] for `0` mHz or a frequency whose
    /// period the timer cannot hold.
    pub fn set_frequency_mhz(&self, millihertz: u32) -> Result<(), TimerError> {
        let period_us =
            period::period_us_from_millihertz(millihertz).ok_or(TimerError::PeriodUnachievable)?;
        self.set_period_us(period_us)
    }

    /// Returns the programmed frequency in millihertz.
    ///
    /// Returns `None` if no period is programmed, or if the period is too
    /// long to resolve at 1 mHz.
    #[must_use]
    pub fn frequency_mhz(&self) -> Option<u32> {
        period::millihertz_from_period_us(self.period_us())
    }

    /// Selects a prescaler divisor directly.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidPrescaler`] if the timer has no such step.
    pub fn set_prescaler(&self, divisor: u32) -> Result<(), TimerError> {
        let prescale =
            Prescale::from_divisor(self.kind(), divisor).ok_or(TimerError::InvalidPrescaler)?;
        self.with_counter_stopped(|| self.write_prescale(prescale));
        Ok(())
    }

    /// Returns the current prescaler divisor.
    #[must_use]
    pub fn prescaler(&self) -> u16 {
        // At most 256.
        self.current_prescale().divisor() as u16
    }

    // ---------------------------------------------------------------------
    // Interrupts
    // ---------------------------------------------------------------------

    /// Assigns or clears the interrupt callback.
    ///
    /// # Errors
    ///
    /// [`TimerError::AlreadyAssigned`] if a callback is present; clear it
    /// with `None` first.
    pub fn set_isr(&self, isr: Option<TimerIsr<B>>) -> Result<(), TimerError> {
        let dispatch = self.manager.dispatch();
        match isr {
            Some(isr) => dispatch.assign(self.line(), isr as *mut ()),
            None => {
                dispatch.unassign(self.line());
                Ok(())
            }
        }
    }

    /// Enables or disables the interrupt source.
    pub fn set_irq_enabled(&self, on: bool) {
        let route = self.route();
        self.reg(route.enable).assign_bits(route.mask, on);
    }

    /// Returns `true` if the interrupt source is enabled.
    #[must_use]
    pub fn is_irq_enabled(&self) -> bool {
        let route = self.route();
        self.reg(route.enable).any_set(route.mask)
    }

    /// Returns `true` if the interrupt is pending.
    #[must_use]
    pub fn pending_flag(&self) -> bool {
        let route = self.route();
        self.reg(route.flag).any_set(route.mask)
    }

    /// Clears the pending interrupt flag.
    pub fn clear_pending_flag(&self) {
        let route = self.route();
        self.reg(route.flag).clear_bits(route.mask);
    }

    /// Sets the interrupt priority (`0..=7`) and sub-priority (`0..=3`).
    ///
    /// The source is masked while the priority group is rewritten through
    /// its CLR and SET aliases, then restored.
    ///
    /// # Errors
    ///
    /// [`TimerError::InvalidPriority`] if either level is out of range.
    pub fn set_interrupt_priority(&self, priority: u8, subpriority: u8) -> Result<(), TimerError> {
        if priority > MAX_PRIORITY || subpriority > MAX_SUBPRIORITY {
            return Err(TimerError::InvalidPriority);
        }
        let route = self.route();
        let enable = self.reg(route.enable);
        let ipc = self.reg(route.priority);
        let field = PRIORITY_GROUP.shifted(route.priority_shift);

        let was_enabled = enable.any_set(route.mask);
        if was_enabled {
            enable.clear_bits(route.mask);
        }
        ipc.clear_bits(field.mask());
        ipc.set_bits(field.place(regs::priority_group(priority, subpriority)));
        if was_enabled {
            enable.set_bits(route.mask);
        }
        Ok(())
    }

    /// Returns the interrupt priority and sub-priority.
    #[must_use]
    pub fn interrupt_priority(&self) -> (u8, u8) {
        let route = self.route();
        let field = PRIORITY_GROUP.shifted(route.priority_shift);
        let group = self.reg(route.priority).read_field(field);
        ((group >> 2) as u8 & MAX_PRIORITY, group as u8 & MAX_SUBPRIORITY)
    }

    /// Returns the interrupt request number (the slave's, for a pair).
    #[must_use]
    pub fn interrupt_number(&self) -> IrqNumber {
        self.route().irq
    }

    /// Returns the interrupt vector number (the slave's, for a pair).
    #[must_use]
    pub fn interrupt_vector(&self) -> VectorNumber {
        self.route().vector
    }

    // ---------------------------------------------------------------------
    // Raw access
    // ---------------------------------------------------------------------

    /// Returns the address of the period register for direct access.
    #[must_use]
    pub fn period_register_ptr(&self) -> *mut u32 {
        self.regs().pr_addr() as *mut u32
    }

    /// Returns the address of the counter register for direct access.
    #[must_use]
    pub fn counter_register_ptr(&self) -> *mut u32 {
        self.regs().tmr_addr() as *mut u32
    }
}

/// An allocated timer.
///
/// Exclusively owns its timer (both halves of a pair). Dropping it, or
/// calling [`release`](Self::release), masks its interrupt, clears its
/// dispatch entry, zeroes its registers and returns it to the manager.
pub struct Timer<'m, B: RegisterIo> {
    view: TimerRef<'m, B>,
}

impl<'m, B: RegisterIo> Timer<'m, B> {
    pub(crate) const fn new(view: TimerRef<'m, B>) -> Self {
        Self { view }
    }

    /// Releases the timer.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let view = &self.view;
        if view.index == INVALID_INDEX {
            return;
        }
        let (manager, index, paired) = (view.manager, view.index, view.paired);
        let number = view.number();

        view.set_irq_enabled(false);
        manager.dispatch().vacate(view.line());

        let mut halves = [Some(index), None];
        if paired {
            halves[1] = Some(index + 1);
        }
        for index in halves.into_iter().flatten() {
            let regs = manager.timer_regs(index);
            regs.set_tcon(TCon::empty());
            regs.set_tmr(0);
            regs.set_pr(0);
        }

        manager
            .registry()
            .free(registry::claim_mask(index, paired));
        self.view.index = INVALID_INDEX;
        manager.budget().release();

        tempo_core::tdebug!("{number} released");
    }
}

impl<'m, B: RegisterIo> Deref for Timer<'m, B> {
    type Target = TimerRef<'m, B>;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

impl<B: RegisterIo> Drop for Timer<'_, B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<B: RegisterIo> fmt::Debug for Timer<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timer").field(&self.view).finish()
    }
}
