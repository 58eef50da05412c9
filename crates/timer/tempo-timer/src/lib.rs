//! Hardware timer manager for PIC32-class counter/compare timers.
//!
//! A [`TimerManager`] owns the timer peripherals described by a chip's
//! descriptor table. Callers [`allocate`](TimerManager::allocate) timers,
//! singly as 16-bit counters or as 32-bit master/slave pairs, program them by
//! period, frequency or raw prescaler, and attach interrupt callbacks. The
//! platform's interrupt vectors reach the manager through the
//! [`trampoline`] module.
//!
//! Register access goes through a [`tempo_mmio::RegisterIo`] bus, so the
//! whole driver runs unchanged against `tempo_mmio::sim::SimulatedIo` on the
//! host.
//!
//! ```ignore
//! let timers = TimerManager::new(io, &tempo_pic32mx::PIC32MX1XX, TimerConfig::new(48_000_000))?;
//! let t2 = timers.allocate(TimerNumber::new(2), CounterWidth::Bits32)?;
//! t2.set_period_us(2_000_000)?;
//! t2.set_isr(Some(on_tick))?;
//! t2.set_mode(TimerMode::FreeRunning);
//! t2.set_irq_enabled(true);
//! t2.set_enabled(true);
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod manager;
pub mod period;
pub mod regs;
pub mod registry;
mod sync;
pub mod timer;
pub mod trampoline;

#[cfg(test)]
mod fixture;

pub use config::TimerConfig;
pub use descriptor::{InterruptRoute, TimerDescriptor, TimerKind};
pub use dispatch::TimerMode;
pub use error::{ConfigError, TimerError};
pub use manager::TimerManager;
pub use tempo_core::id::{IrqNumber, TimerNumber, VectorNumber};
pub use timer::{CounterWidth, Timer, TimerIsr, TimerRef};
