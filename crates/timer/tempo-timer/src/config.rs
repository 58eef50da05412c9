//! Manager configuration and descriptor-table validation.

use tempo_core::id::TimerNumber;

use crate::descriptor::{TimerDescriptor, TimerKind};
use crate::error::ConfigError;
use crate::regs::PRIORITY_GROUP;
use crate::registry::MAX_TIMERS;

/// Runtime configuration of a [`TimerManager`](crate::TimerManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Peripheral bus clock feeding every timer, in Hz.
    pub peripheral_clock_hz: u32,
    /// Maximum number of live handles.
    pub max_handles: usize,
}

impl TimerConfig {
    /// Creates a configuration with a handle budget of one per timer slot.
    #[must_use]
    pub const fn new(peripheral_clock_hz: u32) -> Self {
        Self {
            peripheral_clock_hz,
            max_handles: MAX_TIMERS,
        }
    }

    /// Returns the configuration with a different handle budget.
    #[must_use]
    pub const fn with_max_handles(mut self, max_handles: usize) -> Self {
        self.max_handles = max_handles;
        self
    }
}

/// Checks a descriptor table and configuration before the manager uses them.
///
/// Master/slave adjacency is checked here so that pairing at allocation time
/// only has to look at the requested timer's kind.
pub(crate) fn validate(
    descriptors: &[TimerDescriptor],
    config: &TimerConfig,
) -> Result<(), ConfigError> {
    if descriptors.is_empty() {
        return Err(ConfigError::NoTimers);
    }
    if descriptors.len() > MAX_TIMERS {
        return Err(ConfigError::TooManyTimers(descriptors.len()));
    }
    if config.peripheral_clock_hz == 0 {
        return Err(ConfigError::ZeroClock);
    }
    if config.max_handles == 0 {
        return Err(ConfigError::ZeroHandles);
    }

    for (index, desc) in descriptors.iter().enumerate() {
        // Bounded by MAX_TIMERS above.
        let number = TimerNumber::from_index(index).ok_or(ConfigError::TooManyTimers(index))?;
        if u32::from(desc.interrupt.priority_shift) + u32::from(PRIORITY_GROUP.width()) > 32 {
            return Err(ConfigError::PriorityShift(number));
        }
        match desc.kind {
            TimerKind::A => {}
            TimerKind::BMaster => {
                let next = descriptors.get(index + 1).map(|d| d.kind);
                if next != Some(TimerKind::BSlave) {
                    return Err(ConfigError::UnpairedMaster(number));
                }
            }
            TimerKind::BSlave => {
                let prev = index.checked_sub(1).map(|i| descriptors[i].kind);
                if prev != Some(TimerKind::BMaster) {
                    return Err(ConfigError::OrphanSlave(number));
                }
            }
        }
    }

    Ok(())
}
