//! Timer descriptor tables for PIC32MX parts.
//!
//! The tables under `generated/` are produced by `cargo xtask codegen` from
//! the workspace's `codegen.toml`.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod generated {
    pub mod pic32mx1xx;
}

pub use generated::pic32mx1xx::PIC32MX1XX;

#[cfg(test)]
mod tests {
    use tempo_mmio::sim::SimulatedIo;
    use tempo_timer::{CounterWidth, TimerConfig, TimerKind, TimerManager, TimerNumber};

    use super::*;

    #[test]
    fn pic32mx1xx_table_is_accepted() {
        let timers =
            TimerManager::new(SimulatedIo::new(), &PIC32MX1XX, TimerConfig::new(40_000_000))
                .unwrap();
        assert_eq!(timers.timer_count(), 5);
        assert_eq!(PIC32MX1XX[0].kind, TimerKind::A);
        assert!(timers.allocate(TimerNumber::new(2), CounterWidth::Bits32).is_ok());
        assert!(timers.allocate(TimerNumber::new(4), CounterWidth::Bits32).is_ok());
    }

    #[test]
    fn pairs_interrupt_on_the_slave() {
        let timers =
            TimerManager::new(SimulatedIo::new(), &PIC32MX1XX, TimerConfig::new(40_000_000))
                .unwrap();
        let t45 = timers.allocate(TimerNumber::new(4), CounterWidth::Bits32).unwrap();
        assert_eq!(t45.interrupt_number().as_u8(), 24);
        assert_eq!(t45.interrupt_vector().as_u8(), 20);
        t45.set_irq_enabled(true);
        assert_eq!(timers.io().peek(0xBF88_1060), 1 << 24);
    }
}
