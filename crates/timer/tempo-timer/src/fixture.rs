//! Test descriptor table laid out like a PIC32MX: T1 Type A, T2/T3 and
//! T4/T5 master/slave pairs. Two timers share each priority register, at
//! bit 0 and bit 8.

use tempo_mmio::sim::SimulatedIo;

use crate::{
    InterruptRoute, IrqNumber, TimerConfig, TimerDescriptor, TimerKind, TimerManager, VectorNumber,
};

pub(crate) const CLOCK_HZ: u32 = 48_000_000;
pub(crate) const IEC: usize = 0x1000;
pub(crate) const IFS: usize = 0x1100;
pub(crate) const IPC_BASE: usize = 0x1200;

pub(crate) const fn descriptor(kind: TimerKind, index: usize) -> TimerDescriptor {
    TimerDescriptor {
        kind,
        regs: 0x100 * (index + 1),
        interrupt: InterruptRoute {
            enable: IEC,
            flag: IFS,
            mask: 1 << index,
            priority: IPC_BASE + 0x10 * (index / 2),
            priority_shift: 8 * (index % 2) as u8,
            irq: IrqNumber::new(4 + 5 * index as u8),
            vector: VectorNumber::new(4 + 4 * index as u8),
        },
    }
}

pub(crate) static PIC32MX_LIKE: [TimerDescriptor; 5] = [
    descriptor(TimerKind::A, 0),
    descriptor(TimerKind::BMaster, 1),
    descriptor(TimerKind::BSlave, 2),
    descriptor(TimerKind::BMaster, 3),
    descriptor(TimerKind::BSlave, 4),
];

pub(crate) fn manager_with(config: TimerConfig) -> TimerManager<SimulatedIo> {
    TimerManager::new(SimulatedIo::new(), &PIC32MX_LIKE, config).unwrap()
}

pub(crate) fn manager() -> TimerManager<SimulatedIo> {
    manager_with(TimerConfig::new(CLOCK_HZ))
}

pub(crate) fn tcon(index: usize) -> usize {
    PIC32MX_LIKE[index].regs
}

pub(crate) fn tmr(index: usize) -> usize {
    PIC32MX_LIKE[index].regs + 0x10
}

pub(crate) fn pr(index: usize) -> usize {
    PIC32MX_LIKE[index].regs + 0x20
}
