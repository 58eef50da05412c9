//! Proc-macro crate for the `register_block!` register DSL.
//!
//! Generates typed register-block accessors that route every access through
//! a `tempo_mmio::RegisterIo` bus. Registers tagged `sci` additionally get
//! accessors for the hardware's atomic SET / CLR / INV alias registers.

mod codegen;
mod parse;

use proc_macro::TokenStream;
use syn::parse_macro_input;

use crate::parse::RegisterBlock;

/// Generates a typed register block struct with bus-routed accessors.
///
/// # Syntax
///
/// ```ignore
/// register_block! {
///     /// Doc comment for the struct.
///     pub StructName {
///         /// Doc comment for the register.
///         [offset; u32; access_mode; sci] name => OptionalBitflagsType,
///     }
/// }
/// ```
///
/// - `offset`: byte offset from the block base (integer literal)
/// - `u32`: register width; special-function registers are 32-bit
/// - `access_mode`: `ro` (read-only), `wo` (write-only), `rw` (read-write)
/// - `sci`: optional; the register has SET/CLR/INV aliases at +8/+4/+0xC
/// - `=> Type`: optional bitflags type (must have `from_bits_retain`/`.bits()`)
///
/// # Generated Code
///
/// The struct borrows a bus and stores a base address. For each register:
/// - `ro`/`rw`: `fn name(&self) -> Type`
/// - `wo`/`rw`: `fn set_name(&self, value: Type)`
/// - `sci`: `name_set_bits`, `name_clear_bits`, `name_invert_bits`
/// - always: `fn name_addr(&self) -> usize`
///
/// # Example
///
/// ```ignore
/// use tempo_mmio::register_block;
///
/// register_block! {
///     /// Timer control block.
///     pub TimerRegs {
///         /// Control register.
///         [0x00; u32; rw; sci] tcon => TCon,
///         /// Counter.
///         [0x10; u32; rw; sci] tmr,
///     }
/// }
/// ```
#[proc_macro]
pub fn register_block(input: TokenStream) -> TokenStream {
    let block = parse_macro_input!(input as RegisterBlock);
    codegen::generate(&block).into()
}
