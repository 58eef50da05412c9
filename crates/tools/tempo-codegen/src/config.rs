//! Configuration types for the code generator.
//!
//! Deserialized from `codegen.toml` at the workspace root.

use serde::Deserialize;
use std::path::PathBuf;

/// Hardware variant of a timer, as spelled in `codegen.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKindSpec {
    /// Type A timer.
    A,
    /// Type B timer that can anchor a 32-bit pair.
    BMaster,
    /// Type B timer that forms the upper half of a pair.
    BSlave,
}

impl TimerKindSpec {
    /// Returns the `tempo_timer::TimerKind` variant name.
    pub fn variant(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::BMaster => "BMaster",
            Self::BSlave => "BSlave",
        }
    }
}

/// One physical timer.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerSpec {
    /// 1-based timer number; must match the timer's position in the list.
    pub number: u8,
    /// Hardware variant.
    pub kind: TimerKindSpec,
    /// Base address of the `TxCON` register block.
    pub regs: u32,
    /// Address of the interrupt enable register.
    pub enable: u32,
    /// Address of the interrupt flag register.
    pub flag: u32,
    /// Bit of the timer in the enable and flag registers.
    pub bit: u8,
    /// Address of the interrupt priority register.
    pub priority: u32,
    /// Bit position of the 5-bit priority group.
    pub priority_shift: u8,
    /// Interrupt request number.
    pub irq: u8,
    /// Interrupt vector number.
    pub vector: u8,
}

/// One chip's descriptor table.
#[derive(Debug, Clone, Deserialize)]
pub struct ChipSpec {
    /// Lower-case identifier; the table is emitted as its upper-case form.
    pub name: String,
    /// Doc comment for the generated table.
    pub description: String,
    /// Output file path, relative to workspace root.
    pub output: PathBuf,
    /// Timers in number order.
    pub timers: Vec<TimerSpec>,
}

/// Top-level codegen configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CodegenConfig {
    /// Chips to generate descriptor tables for.
    pub chips: Vec<ChipSpec>,
}
