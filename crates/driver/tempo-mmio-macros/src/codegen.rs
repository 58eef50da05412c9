//! Code generation for the `register_block!` macro.
//!
//! Transforms the parsed register block definition into a struct with typed
//! accessor methods routed through a `RegisterIo` bus.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::parse::{AccessMode, RegisterBlock, RegisterDef};

/// Generates the complete output for a register block definition.
pub fn generate(block: &RegisterBlock) -> TokenStream {
    let vis = &block.vis;
    let name = &block.name;
    let attrs = &block.attrs;

    let methods: Vec<TokenStream> = block.registers.iter().map(generate_methods).collect();

    quote! {
        #(#attrs)*
        #vis struct #name<'io, B: ?Sized> {
            io: &'io B,
            base: usize,
        }

        impl<B: ?Sized> Clone for #name<'_, B> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<B: ?Sized> Copy for #name<'_, B> {}

        impl<'io, B: ::tempo_mmio::RegisterIo + ?Sized> #name<'io, B> {
            /// Creates a register block accessor at `base` on the given bus.
            ///
            /// Validity of `base` is the bus's concern: a
            /// [`VolatileIo`](::tempo_mmio::VolatileIo) is only constructed
            /// once the integrator has vouched for every address it touches.
            #[must_use]
            #vis const fn new(io: &'io B, base: usize) -> Self {
                Self { io, base }
            }

            /// Returns the base address of the block.
            #[must_use]
            #vis const fn base(&self) -> usize {
                self.base
            }

            #(#methods)*
        }
    }
}

/// Generates accessor methods for a single register.
fn generate_methods(reg: &RegisterDef) -> TokenStream {
    let mut methods = TokenStream::new();

    methods.extend(generate_addr(reg));
    if let Some(m) = generate_read(reg) {
        methods.extend(m);
    }
    if let Some(m) = generate_write(reg) {
        methods.extend(m);
    }
    if let Some(m) = generate_aliases(reg) {
        methods.extend(m);
    }

    methods
}

/// Generates the address accessor for a register.
fn generate_addr(reg: &RegisterDef) -> TokenStream {
    let addr_name = format_ident!("{}_addr", reg.name);
    let offset = &reg.offset;
    let doc = format!("Returns the address of the `{}` register.", reg.name);

    quote! {
        #[doc = #doc]
        #[inline]
        #[must_use]
        pub const fn #addr_name(&self) -> usize {
            self.base + #offset
        }
    }
}

/// Generates the read accessor for a register, if applicable.
fn generate_read(reg: &RegisterDef) -> Option<TokenStream> {
    if reg.access == AccessMode::WriteOnly {
        return None;
    }

    let name = &reg.name;
    let offset = &reg.offset;
    let attrs = &reg.attrs;

    if let Some(ref bf_type) = reg.bitflags_type {
        Some(quote! {
            #(#attrs)*
            #[inline]
            pub fn #name(&self) -> #bf_type {
                #bf_type::from_bits_retain(self.io.read_u32(self.base + #offset))
            }
        })
    } else {
        Some(quote! {
            #(#attrs)*
            #[inline]
            pub fn #name(&self) -> u32 {
                self.io.read_u32(self.base + #offset)
            }
        })
    }
}

/// Generates the write accessor for a register, if applicable.
fn generate_write(reg: &RegisterDef) -> Option<TokenStream> {
    if reg.access == AccessMode::ReadOnly {
        return None;
    }

    let name = &reg.name;
    let setter_name = format_ident!("set_{}", name);
    let offset = &reg.offset;

    let set_doc = format!("Writes the `{}` register.", name);
    let (ty, bits) = value_type(reg);

    Some(quote! {
        #[doc = #set_doc]
        #[inline]
        pub fn #setter_name(&self, value: #ty) {
            self.io.write_u32(self.base + #offset, #bits);
        }
    })
}

/// Generates the SET/CLR/INV alias accessors, if the register has them.
fn generate_aliases(reg: &RegisterDef) -> Option<TokenStream> {
    if !reg.aliased {
        return None;
    }

    let name = &reg.name;
    let offset = &reg.offset;
    let set_name = format_ident!("{}_set_bits", name);
    let clear_name = format_ident!("{}_clear_bits", name);
    let invert_name = format_ident!("{}_invert_bits", name);

    let set_doc = format!("Atomically sets the given bits of `{name}` via its SET alias.");
    let clear_doc = format!("Atomically clears the given bits of `{name}` via its CLR alias.");
    let invert_doc = format!("Atomically inverts the given bits of `{name}` via its INV alias.");
    let (ty, bits) = value_type(reg);

    Some(quote! {
        #[doc = #set_doc]
        #[inline]
        pub fn #set_name(&self, value: #ty) {
            self.io.write_u32(self.base + #offset + ::tempo_mmio::SET_OFFSET, #bits);
        }

        #[doc = #clear_doc]
        #[inline]
        pub fn #clear_name(&self, value: #ty) {
            self.io.write_u32(self.base + #offset + ::tempo_mmio::CLR_OFFSET, #bits);
        }

        #[doc = #invert_doc]
        #[inline]
        pub fn #invert_name(&self, value: #ty) {
            self.io.write_u32(self.base + #offset + ::tempo_mmio::INV_OFFSET, #bits);
        }
    })
}

/// Returns the parameter type of a register and the expression yielding its
/// raw `u32` bits from a `value` binding.
fn value_type(reg: &RegisterDef) -> (TokenStream, TokenStream) {
    match reg.bitflags_type {
        Some(ref bf_type) => (quote! { #bf_type }, quote! { value.bits() }),
        None => (quote! { u32 }, quote! { value }),
    }
}
