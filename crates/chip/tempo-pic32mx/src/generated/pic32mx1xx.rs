// Generated by `cargo xtask codegen` from codegen.toml. Do not edit.

use tempo_timer::{InterruptRoute, IrqNumber, TimerDescriptor, TimerKind, VectorNumber};

/// Timer descriptors for the PIC32MX1xx/2xx family (Timer1 to Timer5).
pub static PIC32MX1XX: [TimerDescriptor; 5] = [
    // Timer1
    TimerDescriptor {
        kind: TimerKind::A,
        regs: 0xBF80_0600,
        interrupt: InterruptRoute {
            enable: 0xBF88_1060,
            flag: 0xBF88_1030,
            mask: 1 << 4,
            priority: 0xBF88_10B0,
            priority_shift: 0,
            irq: IrqNumber::new(4),
            vector: VectorNumber::new(4),
        },
    },
    // Timer2
    TimerDescriptor {
        kind: TimerKind::BMaster,
        regs: 0xBF80_0800,
        interrupt: InterruptRoute {
            enable: 0xBF88_1060,
            flag: 0xBF88_1030,
            mask: 1 << 9,
            priority: 0xBF88_10C0,
            priority_shift: 0,
            irq: IrqNumber::new(9),
            vector: VectorNumber::new(8),
        },
    },
    // Timer3
    TimerDescriptor {
        kind: TimerKind::BSlave,
        regs: 0xBF80_0A00,
        interrupt: InterruptRoute {
            enable: 0xBF88_1060,
            flag: 0xBF88_1030,
            mask: 1 << 14,
            priority: 0xBF88_10D0,
            priority_shift: 0,
            irq: IrqNumber::new(14),
            vector: VectorNumber::new(12),
        },
    },
    // Timer4
    TimerDescriptor {
        kind: TimerKind::BMaster,
        regs: 0xBF80_0C00,
        interrupt: InterruptRoute {
            enable: 0xBF88_1060,
            flag: 0xBF88_1030,
            mask: 1 << 19,
            priority: 0xBF88_10E0,
            priority_shift: 0,
            irq: IrqNumber::new(19),
            vector: VectorNumber::new(16),
        },
    },
    // Timer5
    TimerDescriptor {
        kind: TimerKind::BSlave,
        regs: 0xBF80_0E00,
        interrupt: InterruptRoute {
            enable: 0xBF88_1060,
            flag: 0xBF88_1030,
            mask: 1 << 24,
            priority: 0xBF88_10F0,
            priority_shift: 0,
            irq: IrqNumber::new(24),
            vector: VectorNumber::new(20),
        },
    },
];
