//! Period, frequency and prescaler arithmetic.
//!
//! Everything here is pure integer math on 64-bit intermediates; the handle
//! layer turns the results into register writes.
//!
//! A prescaler step is stored as a right-shift amount: divisor `1 << shift`.
//! The selector written to the `TCKPS` field is the step's index in the
//! timer kind's table.

use crate::descriptor::TimerKind;
use crate::error::TimerError;

/// Microseconds per second.
pub const US_PER_SECOND: u64 = 1_000_000;

/// Millihertz-microseconds per unit: `period_us * freq_mhz == 1e9`.
const MHZ_US: u64 = 1_000_000_000;

/// Largest prescaler divisor of any timer kind.
pub const MAX_DIVISOR: u64 = 256;

/// One prescaler step of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescale {
    /// Value of the `TCKPS` field.
    pub selector: u8,
    /// Divisor as a power of two.
    pub shift: u8,
}

impl Prescale {
    /// Returns the clock divisor.
    #[must_use]
    pub const fn divisor(self) -> u32 {
        1 << self.shift
    }

    /// Returns the step with the given selector, if the kind has one.
    #[must_use]
    pub fn from_selector(kind: TimerKind, selector: u8) -> Option<Self> {
        let shift = *kind.prescaler_shifts().get(usize::from(selector))?;
        Some(Self { selector, shift })
    }

    /// Returns the step with exactly the given divisor.
    #[must_use]
    pub fn from_divisor(kind: TimerKind, divisor: u32) -> Option<Self> {
        Self::steps(kind).find(|p| p.divisor() == divisor)
    }

    /// Returns the smallest step whose divisor is at least `min_divisor`.
    #[must_use]
    pub fn at_least(kind: TimerKind, min_divisor: u64) -> Option<Self> {
        Self::steps(kind).find(|p| u64::from(p.divisor()) >= min_divisor)
    }

    fn steps(kind: TimerKind) -> impl Iterator<Item = Self> {
        kind.prescaler_shifts()
            .iter()
            .zip(0u8..)
            .map(|(&shift, selector)| Self { selector, shift })
    }
}

/// A computed period: the prescaler step and the `PR` register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPlan {
    /// Chosen prescaler step.
    pub prescale: Prescale,
    /// Value for the period register.
    pub period_register: u32,
}

/// Smallest divisor that keeps `period_us` within `max_count` ticks.
#[must_use]
pub fn min_divisor(clock_hz: u32, period_us: u32, max_count: u32) -> u64 {
    let ticks = u64::from(clock_hz) * u64::from(period_us);
    ticks.div_ceil(u64::from(max_count) * US_PER_SECOND)
}

/// Number of prescaled ticks in `period_us`.
#[must_use]
pub fn ticks_for(clock_hz: u32, shift: u8, period_us: u32) -> u64 {
    u64::from(clock_hz >> shift) * u64::from(period_us) / US_PER_SECOND
}

/// Microseconds spanned by `ticks` prescaled ticks.
#[must_use]
pub fn us_for(clock_hz: u32, shift: u8, ticks: u32) -> u64 {
    (u64::from(ticks) << shift) * US_PER_SECOND / u64::from(clock_hz)
}

/// Chooses the finest prescaler that fits `period_us` into `max_count`.
///
/// # Errors
///
/// [`TimerError::PeriodUnachievable`] if even the largest divisor cannot hold
/// the period, or if the period rounds down to zero ticks.
pub fn plan(
    kind: TimerKind,
    clock_hz: u32,
    period_us: u32,
    max_count: u32,
) -> Result<PeriodPlan, TimerError> {
    let min = min_divisor(clock_hz, period_us, max_count);
    if min > MAX_DIVISOR {
        return Err(TimerError::PeriodUnachievable);
    }
    let prescale = Prescale::at_least(kind, min).ok_or(TimerError::PeriodUnachievable)?;

    let ticks = ticks_for(clock_hz, prescale.shift, period_us);
    if ticks == 0 || ticks > u64::from(max_count) {
        return Err(TimerError::PeriodUnachievable);
    }

    Ok(PeriodPlan {
        prescale,
        // Bounded by max_count above.
        period_register: ticks as u32,
    })
}

/// Converts a frequency in millihertz to the nearest period in microseconds.
///
/// Returns `None` for `0` mHz, or when the period rounds to zero.
#[must_use]
pub fn period_us_from_millihertz(millihertz: u32) -> Option<u32> {
    if millihertz == 0 {
        return None;
    }
    let mhz = u64::from(millihertz);
    let period = (MHZ_US + mhz / 2) / mhz;
    match u32::try_from(period) {
        Ok(0) | Err(_) => None,
        Ok(us) => Some(us),
    }
}

/// Converts a period in microseconds to the nearest frequency in millihertz.
///
/// Returns `None` for a zero period or one too long to resolve at 1 mHz.
#[must_use]
pub fn millihertz_from_period_us(period_us: u64) -> Option<u32> {
    if period_us == 0 {
        return None;
    }
    let freq = (MHZ_US + period_us / 2) / period_us;
    match u32::try_from(freq) {
        Ok(0) | Err(_) => None,
        Ok(mhz) => Some(mhz),
    }
}
