//! Descriptor table generation.
//!
//! Emits one `static` array of `tempo_timer::TimerDescriptor` per chip. The
//! table is checked here with the same rules `TimerManager::new` applies at
//! runtime, so a bad `codegen.toml` fails the build step instead of boot.

use std::fmt::Write;

use crate::MAX_TIMERS;
use crate::config::{ChipSpec, TimerKindSpec};
use crate::error::CodegenError;

/// Width of the 5-bit interrupt priority group.
const PRIORITY_GROUP_WIDTH: u8 = 5;

/// Formats a register address as `0xXXXX_XXXX`.
pub fn hex_addr(addr: u32) -> String {
    format!("0x{:04X}_{:04X}", addr >> 16, addr & 0xFFFF)
}

/// Checks a chip description.
///
/// # Errors
///
/// Returns the first rule the chip breaks.
pub fn validate(chip: &ChipSpec) -> Result<(), CodegenError> {
    let name_ok = chip.name.starts_with(|c: char| c.is_ascii_lowercase())
        && chip
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !name_ok {
        return Err(CodegenError::InvalidName(chip.name.clone()));
    }
    if chip.timers.is_empty() {
        return Err(CodegenError::NoTimers(chip.name.clone()));
    }
    if chip.timers.len() > MAX_TIMERS {
        return Err(CodegenError::TooManyTimers {
            chip: chip.name.clone(),
            count: chip.timers.len(),
        });
    }

    for (index, timer) in chip.timers.iter().enumerate() {
        if usize::from(timer.number) != index + 1 {
            return Err(CodegenError::TimerOrder {
                chip: chip.name.clone(),
                expected: index + 1,
                found: timer.number,
            });
        }
        if timer.bit >= 32 || timer.priority_shift > 32 - PRIORITY_GROUP_WIDTH {
            return Err(CodegenError::BitRange {
                chip: chip.name.clone(),
                timer: timer.number,
            });
        }

        let paired_ok = match timer.kind {
            TimerKindSpec::A => true,
            TimerKindSpec::BMaster => {
                chip.timers.get(index + 1).map(|t| t.kind) == Some(TimerKindSpec::BSlave)
            }
            TimerKindSpec::BSlave => {
                index > 0 && chip.timers[index - 1].kind == TimerKindSpec::BMaster
            }
        };
        if !paired_ok {
            return Err(CodegenError::Pairing {
                chip: chip.name.clone(),
                timer: timer.number,
            });
        }
    }

    Ok(())
}

/// Generates the Rust source of a chip's descriptor table.
///
/// # Errors
///
/// Returns an error if the chip fails [`validate`].
pub fn generate(chip: &ChipSpec) -> Result<String, CodegenError> {
    validate(chip)?;

    let mut out = String::new();
    writeln!(out, "// Generated by `cargo xtask codegen` from codegen.toml. Do not edit.")?;
    writeln!(out)?;
    writeln!(
        out,
        "use tempo_timer::{{InterruptRoute, IrqNumber, TimerDescriptor, TimerKind, VectorNumber}};"
    )?;
    writeln!(out)?;
    writeln!(out, "/// {}", chip.description)?;
    writeln!(
        out,
        "pub static {}: [TimerDescriptor; {}] = [",
        chip.name.to_ascii_uppercase(),
        chip.timers.len()
    )?;

    for timer in &chip.timers {
        writeln!(out, "    // Timer{}", timer.number)?;
        writeln!(out, "    TimerDescriptor {{")?;
        writeln!(out, "        kind: TimerKind::{},", timer.kind.variant())?;
        writeln!(out, "        regs: {},", hex_addr(timer.regs))?;
        writeln!(out, "        interrupt: InterruptRoute {{")?;
        writeln!(out, "            enable: {},", hex_addr(timer.enable))?;
        writeln!(out, "            flag: {},", hex_addr(timer.flag))?;
        writeln!(out, "            mask: 1 << {},", timer.bit)?;
        writeln!(out, "            priority: {},", hex_addr(timer.priority))?;
        writeln!(out, "            priority_shift: {},", timer.priority_shift)?;
        writeln!(out, "            irq: IrqNumber::new({}),", timer.irq)?;
        writeln!(out, "            vector: VectorNumber::new({}),", timer.vector)?;
        writeln!(out, "        }},")?;
        writeln!(out, "    }},")?;
    }

    writeln!(out, "];")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CodegenConfig, TimerSpec};

    const TWO_TIMERS: &str = r#"
        [[chips]]
        name = "demo"
        description = "Demo chip."
        output = "out.rs"

        [[chips.timers]]
        number = 1
        kind = "b_master"
        regs = 0xBF80_0800
        enable = 0xBF88_1060
        flag = 0xBF88_1030
        bit = 9
        priority = 0xBF88_10C0
        priority_shift = 0
        irq = 9
        vector = 8

        [[chips.timers]]
        number = 2
        kind = "b_slave"
        regs = 0xBF80_0A00
        enable = 0xBF88_1060
        flag = 0xBF88_1030
        bit = 14
        priority = 0xBF88_10D0
        priority_shift = 8
        irq = 14
        vector = 12
    "#;

    fn demo() -> ChipSpec {
        let config: CodegenConfig = toml::from_str(TWO_TIMERS).unwrap();
        config.chips.into_iter().next().unwrap()
    }

    fn timer(number: u8, kind: TimerKindSpec) -> TimerSpec {
        TimerSpec {
            number,
            kind,
            regs: 0,
            enable: 0,
            flag: 0,
            bit: 0,
            priority: 0,
            priority_shift: 0,
            irq: 0,
            vector: 0,
        }
    }

    #[test]
    fn hex_groups_halfwords() {
        assert_eq!(hex_addr(0xBF80_0600), "0xBF80_0600");
        assert_eq!(hex_addr(0x10), "0x0000_0010");
    }

    #[test]
    fn parses_and_generates() {
        let chip = demo();
        assert_eq!(chip.timers[0].kind, TimerKindSpec::BMaster);
        let source = generate(&chip).unwrap();

        assert!(source.starts_with("// Generated by `cargo xtask codegen`"));
        assert!(source.contains("/// Demo chip.\npub static DEMO: [TimerDescriptor; 2] = [\n"));
        assert!(source.contains("        kind: TimerKind::BSlave,\n        regs: 0xBF80_0A00,\n"));
        assert!(source.contains("            mask: 1 << 14,\n"));
        assert!(source.contains("            priority_shift: 8,\n"));
        assert!(source.contains("            vector: VectorNumber::new(8),\n"));
        assert!(source.ends_with("    },\n];\n"));
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["Demo", "9chip", "chip-x", ""] {
            let mut chip = demo();
            chip.name = name.into();
            assert!(matches!(validate(&chip), Err(CodegenError::InvalidName(_))), "{name}");
        }
    }

    #[test]
    fn rejects_misordered_timers() {
        let mut chip = demo();
        chip.timers[1].number = 3;
        assert!(matches!(
            validate(&chip),
            Err(CodegenError::TimerOrder { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn rejects_broken_pairs() {
        let mut chip = demo();
        chip.timers = vec![timer(1, TimerKindSpec::A), timer(2, TimerKindSpec::BSlave)];
        assert!(matches!(validate(&chip), Err(CodegenError::Pairing { timer: 2, .. })));

        chip.timers = vec![timer(1, TimerKindSpec::BMaster)];
        assert!(matches!(validate(&chip), Err(CodegenError::Pairing { timer: 1, .. })));
    }

    #[test]
    fn rejects_out_of_range_bits() {
        let mut chip = demo();
        chip.timers[0].bit = 32;
        assert!(matches!(validate(&chip), Err(CodegenError::BitRange { timer: 1, .. })));

        let mut chip = demo();
        chip.timers[1].priority_shift = 28;
        assert!(matches!(validate(&chip), Err(CodegenError::BitRange { timer: 2, .. })));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        let mut chip = demo();
        chip.timers.clear();
        assert!(matches!(validate(&chip), Err(CodegenError::NoTimers(_))));

        chip.timers = (1..=33).map(|n| timer(n, TimerKindSpec::A)).collect();
        assert!(matches!(
            validate(&chip),
            Err(CodegenError::TooManyTimers { count: 33, .. })
        ));
    }
}
