//! Parsing logic for the `register_block!` DSL.
//!
//! Handles parsing of the DSL syntax into intermediate representation types
//! that the code generator can consume.

use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Ident, LitInt, Token, Visibility, braced, bracketed};

/// A complete register block definition.
pub struct RegisterBlock {
    /// Doc attributes on the struct.
    pub attrs: Vec<Attribute>,
    /// Visibility of the generated struct.
    pub vis: Visibility,
    /// Name of the generated struct.
    pub name: Ident,
    /// Register definitions.
    pub registers: Vec<RegisterDef>,
}

/// Access mode for a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only.
    ReadOnly,
    /// Write-only.
    WriteOnly,
    /// Read-write.
    ReadWrite,
}

/// A single register definition.
pub struct RegisterDef {
    /// Doc attributes on this register.
    pub attrs: Vec<Attribute>,
    /// Byte offset from base.
    pub offset: LitInt,
    /// Access mode.
    pub access: AccessMode,
    /// Whether SET/CLR/INV alias registers follow the base register.
    pub aliased: bool,
    /// Register name (used for method names).
    pub name: Ident,
    /// Optional associated bitflags type.
    pub bitflags_type: Option<Ident>,
}

impl Parse for RegisterBlock {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        let name: Ident = input.parse()?;

        let content;
        braced!(content in input);

        let mut registers = Vec::new();
        while !content.is_empty() {
            registers.push(content.call(parse_register)?);
        }

        Ok(Self {
            attrs,
            vis,
            name,
            registers,
        })
    }
}

/// Parses a single register definition line.
fn parse_register(input: ParseStream) -> syn::Result<RegisterDef> {
    let attrs = input.call(Attribute::parse_outer)?;

    // Parse [offset; width; access_mode] or [offset; width; access_mode; sci]
    let bracket_content;
    bracketed!(bracket_content in input);

    let offset: LitInt = bracket_content.parse()?;
    bracket_content.parse::<Token![;]>()?;

    let width_ident: Ident = bracket_content.parse()?;
    if width_ident != "u32" {
        return Err(syn::Error::new(
            width_ident.span(),
            "expected register width: u32",
        ));
    }

    bracket_content.parse::<Token![;]>()?;

    let access_ident: Ident = bracket_content.parse()?;
    let access = match access_ident.to_string().as_str() {
        "ro" => AccessMode::ReadOnly,
        "wo" => AccessMode::WriteOnly,
        "rw" => AccessMode::ReadWrite,
        _ => {
            return Err(syn::Error::new(
                access_ident.span(),
                "expected access mode: ro, wo, or rw",
            ));
        }
    };

    let aliased = if bracket_content.peek(Token![;]) {
        bracket_content.parse::<Token![;]>()?;
        let alias_ident: Ident = bracket_content.parse()?;
        if alias_ident != "sci" {
            return Err(syn::Error::new(
                alias_ident.span(),
                "expected alias marker: sci",
            ));
        }
        if access == AccessMode::ReadOnly {
            return Err(syn::Error::new(
                alias_ident.span(),
                "read-only registers cannot have SET/CLR/INV aliases",
            ));
        }
        true
    } else {
        false
    };

    if !bracket_content.is_empty() {
        return Err(bracket_content.error("unexpected tokens in register descriptor"));
    }

    // Parse register name.
    let name: Ident = input.parse()?;

    // Parse optional `=> Type`.
    let bitflags_type = if input.peek(Token![=>]) {
        input.parse::<Token![=>]>()?;
        Some(input.parse::<Ident>()?)
    } else {
        None
    };

    // Consume trailing comma if present.
    let _ = input.parse::<Option<Token![,]>>();

    Ok(RegisterDef {
        attrs,
        offset,
        access,
        aliased,
        name,
        bitflags_type,
    })
}
